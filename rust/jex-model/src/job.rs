use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ModelError, Step, SubmissionSettings};

/// Characters that separate or match words in a topic routing key.
const ROUTING_KEY_METACHARACTERS: [char; 3] = ['.', '*', '#'];

/// Check that `invocation_id` can name control queues and routing keys that
/// belong to this invocation alone.
pub fn check_invocation_id(invocation_id: &str) -> Result<(), ModelError> {
    if invocation_id.trim().is_empty() {
        return Err(ModelError::MissingInvocationId);
    }

    if invocation_id.contains(ROUTING_KEY_METACHARACTERS) {
        return Err(ModelError::InvalidInvocationId(invocation_id.to_string()));
    }

    Ok(())
}

/// A job as submitted for execution. The gateway never persists a [Job]; it
/// is validated, enriched with [SubmissionSettings] and then embedded in the
/// launch message verbatim, including any fields this type does not model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Free-form description supplied by the submitter
    #[serde(default)]
    pub description: String,

    /// Identifies this invocation of the job for its whole lifetime; the
    /// per-invocation control queues are named after it
    #[serde(
        rename = "uuid",
        alias = "invocation_id",
        alias = "InvocationID",
        default
    )]
    pub invocation_id: String,

    /// Display name of the job
    #[serde(default)]
    pub name: String,

    /// The user the job runs on behalf of
    #[serde(rename = "username", alias = "submitter", default)]
    pub submitter: String,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Files the backend should skip when staging outputs
    #[serde(default)]
    pub filter_files: Vec<String>,

    /// Disk space requested from the execution backend
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_disk: String,

    /// Everything else in the submission, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Parse and validate a raw submission, then fold the deployment's
    /// [SubmissionSettings] into it.
    pub fn from_submission(data: &[u8], settings: &SubmissionSettings) -> Result<Job, ModelError> {
        let mut job: Job = serde_json::from_slice(data)?;

        job.validate()?;
        settings.apply(&mut job);

        debug!(
            "Accepted submission for invocation {} with {} step(s)",
            job.invocation_id,
            job.steps.len()
        );

        Ok(job)
    }

    /// A job is dispatchable when it names its invocation with a usable ID and
    /// has at least one step to run.
    pub fn validate(&self) -> Result<(), ModelError> {
        check_invocation_id(&self.invocation_id)?;

        if self.steps.is_empty() {
            return Err(ModelError::MissingSteps(self.invocation_id.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{check_invocation_id, Job, ModelError, SubmissionSettings};

    fn submission() -> serde_json::Value {
        json!({
            "description": "a test job",
            "uuid": "inv-123",
            "name": "wc",
            "username": "ipctest",
            "app_id": "c7f05682-23c8-4182-b9a2-e09650a5f49b",
            "steps": [
                {
                    "type": "condor",
                    "config": {
                        "params": [
                            { "id": "p1", "name": "-l", "value": "", "order": 1 },
                            { "id": "p0", "name": "", "value": "input.txt", "order": 2 }
                        ],
                        "input": []
                    }
                },
                {
                    "type": "condor",
                    "config": { "params": [] }
                }
            ]
        })
    }

    #[test]
    fn it_accepts_a_valid_submission() {
        let data = serde_json::to_vec(&submission()).unwrap();
        let job = Job::from_submission(&data, &SubmissionSettings::default()).unwrap();

        assert_eq!(job.invocation_id, "inv-123");
        assert_eq!(job.description, "a test job");
        assert_eq!(job.submitter, "ipctest");
        assert_eq!(job.steps.len(), 2);
        assert_eq!(job.steps[0].config.params[1].value, "input.txt");
    }

    #[test]
    fn it_keeps_fields_it_does_not_model() {
        let data = serde_json::to_vec(&submission()).unwrap();
        let job = Job::from_submission(&data, &SubmissionSettings::default()).unwrap();
        let round_tripped = serde_json::to_value(&job).unwrap();

        assert_eq!(
            round_tripped["app_id"],
            json!("c7f05682-23c8-4182-b9a2-e09650a5f49b")
        );
        assert_eq!(round_tripped["uuid"], json!("inv-123"));
        assert_eq!(round_tripped["steps"][0]["type"], json!("condor"));
        assert_eq!(round_tripped["steps"][0]["config"]["input"], json!([]));
    }

    #[test]
    fn it_accepts_the_long_form_invocation_id() {
        let data = serde_json::to_vec(&json!({
            "invocation_id": "inv-456",
            "steps": [{ "config": { "params": [] } }]
        }))
        .unwrap();
        let job = Job::from_submission(&data, &SubmissionSettings::default()).unwrap();

        assert_eq!(job.invocation_id, "inv-456");
    }

    #[test]
    fn it_rejects_a_submission_without_an_invocation_id() {
        let mut body = submission();
        body["uuid"] = json!("  ");
        let data = serde_json::to_vec(&body).unwrap();

        assert!(matches!(
            Job::from_submission(&data, &SubmissionSettings::default()),
            Err(ModelError::MissingInvocationId)
        ));
    }

    #[test]
    fn it_rejects_invocation_ids_that_would_match_other_routing_keys() {
        for invocation_id in ["#", "*", "inv.123", "inv-#", "a*b"] {
            let mut body = submission();
            body["uuid"] = json!(invocation_id);
            let data = serde_json::to_vec(&body).unwrap();

            assert!(matches!(
                Job::from_submission(&data, &SubmissionSettings::default()),
                Err(ModelError::InvalidInvocationId(id)) if id == invocation_id
            ));
        }
    }

    #[test]
    fn it_accepts_uuid_shaped_invocation_ids() {
        assert!(check_invocation_id("07b04ce2-7757-4b21-9e15-0b4c2f44be26").is_ok());
        assert!(check_invocation_id("inv_123").is_ok());
        assert!(matches!(
            check_invocation_id(""),
            Err(ModelError::MissingInvocationId)
        ));
    }

    #[test]
    fn it_rejects_a_submission_without_steps() {
        let mut body = submission();
        body["steps"] = json!([]);
        let data = serde_json::to_vec(&body).unwrap();

        assert!(matches!(
            Job::from_submission(&data, &SubmissionSettings::default()),
            Err(ModelError::MissingSteps(id)) if id == "inv-123"
        ));
    }

    #[test]
    fn it_rejects_malformed_json() {
        assert!(matches!(
            Job::from_submission(b"{\"uuid\": ", &SubmissionSettings::default()),
            Err(ModelError::Malformed(_))
        ));
        assert!(matches!(
            Job::from_submission(b"[1, 2, 3]", &SubmissionSettings::default()),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn it_applies_submission_settings() {
        let data = serde_json::to_vec(&submission()).unwrap();
        let settings = SubmissionSettings {
            filter_files: vec!["foo".into(), "bar".into()],
            request_disk: Some("0".into()),
        };
        let job = Job::from_submission(&data, &settings).unwrap();

        assert_eq!(job.filter_files, vec!["foo", "bar"]);
        assert_eq!(job.request_disk, "0");
    }
}
