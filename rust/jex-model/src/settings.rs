use crate::Job;

/// Deployment-wide values that are folded into every accepted job before it
/// is handed to the execution backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionSettings {
    /// File names the backend should leave out when staging outputs
    pub filter_files: Vec<String>,
    /// Disk request applied to jobs that do not specify one
    pub request_disk: Option<String>,
}

impl SubmissionSettings {
    /// Parse a comma-separated filter list, dropping empty entries.
    pub fn parse_filter_files(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect()
    }

    /// Merge these settings into `job`. Filter files the job already names are
    /// not repeated, and an explicit disk request on the job wins.
    pub fn apply(&self, job: &mut Job) {
        for filter in &self.filter_files {
            if !job.filter_files.contains(filter) {
                job.filter_files.push(filter.clone());
            }
        }

        if job.request_disk.is_empty() {
            if let Some(request_disk) = &self.request_disk {
                job.request_disk = request_disk.clone();
            }
        }
    }
}
