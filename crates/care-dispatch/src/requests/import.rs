use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{
    parse_timestamp, Request, RequestId, RequestPriority, RequestStatus, UnknownLabel,
    UNASSIGNED_PROVIDER,
};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, detail: String },
    DuplicateId(RequestId),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read request export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid request CSV data: {}", err),
            ImportError::InvalidRow { line, detail } => {
                write!(f, "invalid request on line {}: {}", line, detail)
            }
            ImportError::DuplicateId(id) => write!(f, "request id '{}' appears more than once", id),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidRow { .. } | ImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a working set of requests from the CSV layout written by
/// [`write_csv`](super::export::write_csv).
pub struct CsvRequestSource;

impl CsvRequestSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Request>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Request>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let mut seen: HashSet<RequestId> = HashSet::new();
        let mut requests = Vec::new();

        for (offset, row) in csv_reader.deserialize::<RequestRow>().enumerate() {
            // header occupies line 1
            let line = offset + 2;
            let request = row?
                .into_request()
                .map_err(|detail| ImportError::InvalidRow { line, detail })?;

            if !seen.insert(request.id.clone()) {
                return Err(ImportError::DuplicateId(request.id));
            }
            requests.push(request);
        }

        Ok(requests)
    }
}

#[derive(Debug, Deserialize)]
struct RequestRow {
    id: String,
    facility: String,
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    provider: Option<String>,
    #[serde(rename = "type")]
    request_type: String,
    status: String,
    priority: String,
    created: String,
    estimated: String,
}

impl RequestRow {
    /// Coded columns are trimmed; free-text columns are kept verbatim.
    fn into_request(self) -> Result<Request, String> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err("id must not be empty".to_string());
        }

        let status: RequestStatus = self
            .status
            .trim()
            .parse()
            .map_err(|err: UnknownLabel| err.to_string())?;
        let priority: RequestPriority = self
            .priority
            .trim()
            .parse()
            .map_err(|err: UnknownLabel| err.to_string())?;
        let created = parse_timestamp(self.created.trim()).map_err(|err| {
            format!("created '{}' is not YYYY-MM-DD HH:MM ({err})", self.created)
        })?;
        let estimated = parse_timestamp(self.estimated.trim()).map_err(|err| {
            format!(
                "estimated '{}' is not YYYY-MM-DD HH:MM ({err})",
                self.estimated
            )
        })?;

        Ok(Request {
            id: RequestId(id.to_string()),
            facility: self.facility,
            location: self.location,
            provider: self
                .provider
                .unwrap_or_else(|| UNASSIGNED_PROVIDER.to_string()),
            request_type: self.request_type,
            status,
            priority,
            created,
            estimated,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
