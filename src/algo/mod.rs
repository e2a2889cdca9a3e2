pub mod classify;
pub mod collate;
pub mod extract;
pub mod handle;
pub mod normalize;
pub mod pipeline;
pub mod relations;
pub mod report;
pub mod view;
pub mod walk;
