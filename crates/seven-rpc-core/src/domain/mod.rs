//! Domain model (calls, parameters, signatures, responses, errors).
//!
//! transport にも handler の実装にも依存しない「形」だけを定義します。

pub mod errors;
pub mod params;
pub mod response;
pub mod signature;

pub use self::errors::{
    BAD_REQUEST_STATUS, ERROR_STATUS, ErrorKind, HandlerError, NOT_FOUND_STATUS, RpcError,
    SUCCESS_STATUS,
};
pub use self::params::{MethodCall, Params};
pub use self::response::{Fault, MethodResponse, Reply};
pub use self::signature::{ParamSpec, Signature};
