mod demo_detail;
mod demo_list;
mod record_actions;
mod user_detail;
mod user_list;

pub use demo_detail::DemoDetailView;
pub use demo_list::DemoListView;
pub use user_detail::UserDetailView;
pub use user_list::UserListView;
