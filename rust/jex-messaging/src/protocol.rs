use jex_model::Job;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Version stamped on every message this gateway produces
pub const PROTOCOL_VERSION: i32 = 0;
/// Reason given for stops requested through the gateway
pub const USER_STOP_REASON: &str = "User request";
/// Identity the gateway acts as when it requests a stop
pub const SYSTEM_USERNAME: &str = "system";

/// What a [JobRequest] asks the backend to do. Encoded on the wire as an
/// integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the enclosed job
    Launch,
    /// Stop the enclosed job. The gateway sends stops as [StopRequest]s and
    /// never produces this code; it is decoded for consumers of the launches
    /// key that see it from other producers.
    Stop,
}

impl Command {
    fn code(&self) -> u8 {
        match self {
            Command::Launch => 0,
            Command::Stop => 1,
        }
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(Command::Launch),
            1 => Ok(Command::Stop),
            other => Err(D::Error::custom(format!("Unknown command code {other}"))),
        }
    }
}

/// The envelope published on the launches routing key, carrying the
/// submitted job unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobRequest {
    /// The job to run
    pub job: Job,
    /// What to do with it
    pub command: Command,
    /// Optional free-form annotation
    #[serde(default)]
    pub message: String,
    /// Message format version
    #[serde(default)]
    pub version: i32,
}

impl JobRequest {
    /// A request to launch `job`.
    pub fn launch(job: Job) -> Self {
        JobRequest {
            job,
            command: Command::Launch,
            message: String::new(),
            version: PROTOCOL_VERSION,
        }
    }

    /// The invocation the enclosed job belongs to
    pub fn invocation_id(&self) -> &str {
        &self.job.invocation_id
    }
}

/// Asks whoever is consuming an invocation's stop queue to cancel it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRequest {
    /// Human-readable cause
    #[serde(rename = "Reason")]
    pub reason: String,
    /// Who asked for the stop
    #[serde(rename = "Username")]
    pub username: String,
    /// Message format version
    #[serde(rename = "Version", default)]
    pub version: i32,
    /// The invocation to stop
    #[serde(rename = "InvocationID")]
    pub invocation_id: String,
}

impl StopRequest {
    /// The stop the gateway issues when a caller asks for one. Caller-supplied
    /// identities and reasons are not supported yet, so these are fixed.
    pub fn user_request(invocation_id: &str) -> Self {
        StopRequest {
            reason: USER_STOP_REASON.into(),
            username: SYSTEM_USERNAME.into(),
            version: PROTOCOL_VERSION,
            invocation_id: invocation_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jex_model::Job;
    use serde_json::json;

    use super::{Command, JobRequest, StopRequest};

    #[test]
    fn it_encodes_a_stop_request_in_wire_form() {
        let encoded = serde_json::to_value(StopRequest::user_request("inv-123")).unwrap();

        assert_eq!(
            encoded,
            json!({
                "Reason": "User request",
                "Username": "system",
                "Version": 0,
                "InvocationID": "inv-123"
            })
        );
    }

    #[test]
    fn it_wraps_the_job_in_a_launch_envelope() {
        let job = Job {
            description: "wc all the things".into(),
            invocation_id: "inv-123".into(),
            ..Default::default()
        };
        let encoded = serde_json::to_value(JobRequest::launch(job)).unwrap();

        assert_eq!(encoded["Command"], json!(0));
        assert_eq!(encoded["Version"], json!(0));
        assert_eq!(encoded["Job"]["uuid"], json!("inv-123"));
        assert_eq!(encoded["Job"]["description"], json!("wc all the things"));
    }

    #[test]
    fn it_reads_back_what_consumers_receive() {
        let request: JobRequest = serde_json::from_value(json!({
            "Job": { "uuid": "inv-9", "description": "d", "steps": [] },
            "Command": 1
        }))
        .unwrap();

        assert_eq!(request.command, Command::Stop);
        assert_eq!(request.invocation_id(), "inv-9");
        assert_eq!(request.version, 0);
    }

    #[test]
    fn it_refuses_unknown_command_codes() {
        let result = serde_json::from_value::<JobRequest>(json!({
            "Job": { "uuid": "inv-9" },
            "Command": 7
        }));

        assert!(result.is_err());
    }
}
