pub mod correlation;
pub mod template_tracker;
