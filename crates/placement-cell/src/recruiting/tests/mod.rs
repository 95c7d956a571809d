mod common;
mod pipeline;
