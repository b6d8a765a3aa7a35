pub mod archive;
pub mod config;
pub mod convert;
pub mod history;
pub mod pipeline;
pub mod registry;
pub mod track;
pub mod web;
