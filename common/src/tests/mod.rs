mod http_status;
mod post;
