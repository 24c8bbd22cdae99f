pub mod report;
pub mod session;

pub use report::render_report;
pub use session::{
    BlockRow, LookupRequest, LookupState, ParamRow, Session, SignatureView, NO_DATA,
};
