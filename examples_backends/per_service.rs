use ezlog::options::*;
use ezlog::{fields, Log};

fn main() -> Result<(), ezlog::LogError> {
    let log = Log::new([
        with_output_file_path("./logs", "auth"),
        with_level_debug(),
        with_caller(),
        with_custom_msg_key("msg"),
        with_global_prefix(fields! { "service" => "auth", "region" => "eu-west-1" }),
    ])?;

    log.info().msg("starting service");

    log.error_with(&fields! { "user_id" => 42 })
        .str("reason", "invalid password")
        .msg("authentication failed");

    let err = std::io::Error::other("connection reset");
    log.warn().err(&err).int("retry", 1).msg("upstream unavailable");

    println!("records written to {}", log.options().log_file().display());
    Ok(())
}
