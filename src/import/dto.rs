use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub encoding: &'static str,
    pub count: usize,
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub inserted: u64,
}
