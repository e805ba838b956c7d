//! Fixed addresses, routes, and file names shared by client and server.

/// TCP port the quote server listens on.
pub const SERVER_PORT: u16 = 8080;
/// The single route served by the quote server.
pub const QUOTE_ROUTE: &str = "/cotacao";
/// External pricing endpoint for the dollar to real quote.
pub const PRICING_API_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";
/// SQLite database file written by the server.
pub const DATABASE_PATH: &str = "cotacao.db";
/// Text artifact written by the client.
pub const ARTIFACT_PATH: &str = "cotacao.txt";

/// Helper to format an address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}

/// URL of the quote route on a server reachable at `host:port`.
pub fn quote_url(host: &str, port: u16) -> String {
    format!("http://{}{}", addr(host, port), QUOTE_ROUTE)
}
