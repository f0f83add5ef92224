pub mod codec;
pub mod descriptor;
pub mod envelope;
pub mod kind;

pub use codec::{BLUETOOTH_TARGET, decode, encode};
pub use descriptor::ConnectionDescriptor;
pub use envelope::{ConfigMode, EnvelopeError, StreamPath, decode_path, encode_path, parse_url};
pub use kind::{Field, FieldSpec, InputClass, StreamKind, UnknownField, UnknownKind, fields_for};
