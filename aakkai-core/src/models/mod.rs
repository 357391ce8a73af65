mod inquiry;
mod notification;
mod profile;
mod project;
mod role;
mod testimonial;

pub use inquiry::*;
pub use notification::*;
pub use profile::*;
pub use project::*;
pub use role::*;
pub use testimonial::*;
