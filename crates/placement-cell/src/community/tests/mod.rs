mod common;
mod posts;
mod routing;
