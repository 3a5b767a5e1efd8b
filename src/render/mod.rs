pub mod render_plan;

pub use render_plan::{build_render_plan, RenderPlan};
