pub mod article;
pub mod member;
pub mod robot;
pub mod task;

pub use article::Article;
pub use member::{Member, MemberStats, MemberSummary};
pub use robot::Robot;
pub use task::Task;
