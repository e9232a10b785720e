mod browse;
mod project_detail;

pub use browse::ProjectBrowserView;
pub use project_detail::ProjectDetailView;
