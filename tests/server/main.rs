mod handlers;
mod http;
mod support;
