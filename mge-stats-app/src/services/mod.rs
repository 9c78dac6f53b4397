pub mod nickname_resolver;
