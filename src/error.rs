use strum_macros::Display;

#[derive(Display, Debug)]
pub enum Error {
    ProtoVerb,
    ProtoPath,
    ProtoLength,
    ProtoHeader,

    StoreNotFound,
    StorePermissionDenied,
    StorePathInvalid,
    StoreIo,

    Net(std::io::Error),

    Timeout,
}

impl Error {
    /// Reason phrase reported to the client when a command fails.
    pub fn reason(&self) -> &'static str {
        match self {
            Error::StoreNotFound => "not found",
            Error::StorePermissionDenied => "permission denied",
            Error::StorePathInvalid => "invalid path",
            Error::StoreIo => "io error",
            Error::Timeout => "timeout",
            _ => "error",
        }
    }

    /// Errors that end the connection rather than the command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ProtoVerb
                | Error::ProtoPath
                | Error::ProtoLength
                | Error::ProtoHeader
                | Error::Net(_)
        )
    }
}

impl std::error::Error for Error {}
