pub mod datasource;
pub mod model;
pub mod pipeline;
pub mod window;
