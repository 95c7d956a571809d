mod common;
mod prefill;
