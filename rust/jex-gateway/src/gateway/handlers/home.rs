pub const GREETING: &str = "Welcome to the JEX.\n";

pub async fn home_handler() -> &'static str {
    GREETING
}
