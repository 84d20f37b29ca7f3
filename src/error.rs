use std::fmt;
use log::error;

/// Which boundary a failure was caught at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind
{   /// Discovery endpoint unreachable or body unusable
    DiscoveryError
  , /// Generation exceeded the configured ceiling
    Timeout
  , /// Generation endpoint answered with a non-200 status
    ServerError
  , /// Transport or client library failure
    HttpError
}

impl fmt::Display for ErrorKind
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   let name = match self
        {   ErrorKind::DiscoveryError => "discovery error"
          , ErrorKind::Timeout => "timeout"
          , ErrorKind::ServerError => "server error"
          , ErrorKind::HttpError => "http error"
        };
        f.write_str(name)
    }
}

/// Error type for chatbot operations.
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error
{   pub kind: ErrorKind
  , pub message: String
}

impl Error
{   pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self
    {   Error
        {   kind
          , message: message.into()
        }
    }

    pub fn discovery(message: impl Into<String>) -> Self
    {   Error::new(ErrorKind::DiscoveryError, message)
    }

    pub fn timeout() -> Self
    {   Error::new(ErrorKind::Timeout, "Request timed out")
    }

    /// Non-200 answer; keeps the status and the server's body text
    pub fn server(status: u16, body: &str) -> Self
    {   Error::new(
          ErrorKind::ServerError,
          format!(
            "Failed to generate response; status {} => {}",
            status, body
          )
        )
    }

    pub fn http(message: impl Into<String>) -> Self
    {   Error::new(ErrorKind::HttpError, message)
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   error!("Request timed out: {}", e);
            return Error::timeout();
        }

        if let Some(status) = e.status()
        {   error!("HTTP error occurred: {}", status.as_u16());
            return Error::http(format!(
              "Request failed with status code, {}",
              status.as_u16()
            ));
        }

        if e.is_decode()
        {   error!("Parse error: {}", e);
            return Error::http(format!(
              "Invalid response body: {}", e
            ));
        }

        error!("HTTP error: {}", e);
        Error::http(format!("Request failed: {}", e))
    }
}
