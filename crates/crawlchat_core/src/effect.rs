/// Work the front end must hand to the remote service.
///
/// Each accepted submission yields exactly one effect; rejected ones yield none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStatus,
    SubmitIngest { url: String },
    SubmitQuery { query: String },
}
