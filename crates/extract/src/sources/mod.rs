// ABOUTME: The two source parsers behind a shared contract: parse(content, url) -> ParsedScenario.
// ABOUTME: booth consumes listing-page markup; talto consumes a structured JSON API response.

pub mod booth;
pub mod talto;
