use crate::Error;

/// One status line sent back per command. A GET body follows its `Len`
/// line; everything else is the line alone.
#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Len(u64),
    Version(u64),
    Err(&'static str),
}

impl Reply {
    pub fn for_error(error: &Error) -> Reply {
        Reply::Err(error.reason())
    }

    /// Serialize to the wire line, terminator included.
    pub fn to_line(&self) -> String {
        match self {
            Reply::Ok => "OK\n".to_string(),
            Reply::Len(len) => format!("OK {}\n", len),
            Reply::Version(version) => format!("OK {}\n", version),
            Reply::Err(reason) => format!("ERR {}\n", reason),
        }
    }
}
