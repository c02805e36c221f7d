pub mod assemble;
pub mod convert;
pub mod envman;
pub mod flatten;
pub mod step;
pub mod types;
pub mod xcrun;

pub use assemble::assemble;
pub use convert::{
    convert_xcresult_json_to_junit_xml, convert_xcresult_json_to_junit_xml_at, to_junit_xml,
    ConvertError,
};
pub use flatten::{flatten, flatten_at, parse_duration, SuiteMap};
