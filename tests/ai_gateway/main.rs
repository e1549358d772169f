mod credentials;
mod support;
mod timeout;
