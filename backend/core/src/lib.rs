pub mod error;
pub mod http;
pub mod media;
pub mod operation;
pub mod payload;
pub mod traits;
pub mod types;

pub use error::{CogError, CogResult};
pub use http::{
    operation_location, parse_error_envelope, remote_error, ServiceClient,
    OPERATION_LOCATION_HEADER, SUBSCRIPTION_KEY_HEADER, SUBSCRIPTION_REGION_HEADER,
};
pub use media::{detect_mime_type, is_audio, is_image, load_local_file};
pub use operation::{OperationState, PollOptions, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_MAX_WAIT};
pub use payload::{PayloadKind, RequestPayload};
pub use traits::Analyzer;
pub use types::{query_token, HarmCategory, ServiceCredentials, Severity, MAX_SEVERITY};
