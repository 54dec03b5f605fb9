//! Slash command parser for the text front end.
//!
//! Commands start with `/`. Item names may contain spaces: either quote them
//! (`/suche "Eisen Barren" 3`) or let the parser take trailing numbers as the
//! numeric arguments. Named arguments in `key:value` form (`menge:3 marge:20`) are
//! accepted as well, mirroring how chat platforms display slash command options.
//!
//! A trailing `?` after an item command requests autocomplete choices instead
//! (`/suche eis?`).
use log::trace;

/// A fully parsed command ready for [`super::CommandProcessor::handle`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Reload all worksheets.
    Refresh,
    /// Price lookup with optional quantity and margin override.
    SearchPrice {
        name: String,
        quantity: u32,
        margin: Option<f64>,
    },
    /// Propose a new price for an existing item.
    ProposePrice { name: String, new_price: f64 },
    /// Report an item missing from the price list.
    ProposeItem { name: String },
    /// Show the ingredients of an item.
    ShowRecipe { name: String },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    Command(Command),
    /// Partial item name to complete.
    Autocomplete(String),
    Unknown,
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Refresh,
    Search,
    ProposePrice,
    ProposeItem,
    Recipe,
    Help,
}

impl Keyword {
    fn lookup(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "update" | "refresh" => Some(Keyword::Refresh),
            "suche" | "search" => Some(Keyword::Search),
            "preis-vorschlagen" | "propose-price" => Some(Keyword::ProposePrice),
            "item-vorschlagen" | "propose-item" => Some(Keyword::ProposeItem),
            "rezept" | "recipe" => Some(Keyword::Recipe),
            "help" | "hilfe" => Some(Keyword::Help),
            _ => None,
        }
    }

    /// Commands whose item argument offers autocomplete.
    fn autocompletes(self) -> bool {
        matches!(self, Keyword::Search | Keyword::ProposePrice | Keyword::Recipe)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    quoted: bool,
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '“' | '”' | '„')
}

/// Split on whitespace, keeping quoted runs together.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in input.chars() {
        if is_quote(c) {
            in_quotes = !in_quotes;
            quoted = true;
        } else if c.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                tokens.push(Token { text: std::mem::take(&mut current), quoted });
            }
            quoted = false;
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() || quoted {
        tokens.push(Token { text: current, quoted });
    }
    tokens
}

/// Parse a number typed by a user. Accepts `12,5`, `12.5`, `20%` and `10 €`.
pub fn parse_user_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches(['%', '€'])
        .trim()
        .replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_quantity(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(q) if q >= 1 => Ok(q),
        _ => Err(format!("Ungültige Menge '{}': erwartet wird eine ganze Zahl ab 1", raw)),
    }
}

/// Arguments after the command keyword, split into named values, item name and
/// trailing numeric positionals.
struct Arguments {
    named: Vec<(String, String)>,
    name: String,
    numbers: Vec<String>,
}

impl Arguments {
    fn parse(rest: &str, max_numbers: usize) -> Self {
        let mut named = Vec::new();
        let mut positional = Vec::new();
        for token in tokenize(rest) {
            let option = token
                .text
                .split_once(':')
                .filter(|(key, _)| !token.quoted && is_option_key(key))
                .map(|(key, value)| (key.to_lowercase(), value.to_string()));
            match option {
                Some(pair) => named.push(pair),
                None => positional.push(token),
            }
        }

        let mut numbers = Vec::new();
        while numbers.len() < max_numbers && positional.len() > 1 {
            let trailing_number = positional
                .last()
                .map(|t| !t.quoted && parse_user_number(&t.text).is_some())
                .unwrap_or(false);
            if !trailing_number {
                break;
            }
            if let Some(token) = positional.pop() {
                numbers.insert(0, token.text);
            }
        }

        let name = positional
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        Self { named, name, numbers }
    }

    fn named(&self, key: &str) -> Option<&str> {
        self.named
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn is_option_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "name" | "menge" | "marge" | "preis" | "quantity" | "margin" | "price"
    )
}

/// Minimal slash command parser
pub struct CommandParser;

impl CommandParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &str) -> ParsedCommand {
        let trimmed = raw.trim();
        let Some(body) = trimmed.strip_prefix('/') else {
            return ParsedCommand::Unknown;
        };
        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (body, ""),
        };
        let Some(keyword) = Keyword::lookup(word) else {
            trace!("Unknown command '{}'", word);
            return ParsedCommand::Unknown;
        };

        if keyword.autocompletes() {
            if let Some(partial) = rest.strip_suffix('?') {
                trace!("Parsed autocomplete request from '{}'", raw);
                return ParsedCommand::Autocomplete(partial.trim().to_string());
            }
        }

        let parsed = match keyword {
            Keyword::Refresh => Ok(Command::Refresh),
            Keyword::Help => Ok(Command::Help),
            Keyword::Search => Self::search(rest),
            Keyword::ProposePrice => Self::propose_price(rest),
            Keyword::ProposeItem => Self::required_name(rest).map(|name| Command::ProposeItem { name }),
            Keyword::Recipe => Self::required_name(rest).map(|name| Command::ShowRecipe { name }),
        };
        match parsed {
            Ok(command) => {
                trace!("Parsed {:?} from '{}'", command, raw);
                ParsedCommand::Command(command)
            }
            Err(reason) => ParsedCommand::Invalid(reason),
        }
    }

    fn item_name(args: &Arguments) -> Result<String, String> {
        let name = args
            .named("name")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(args.name.as_str());
        if name.is_empty() {
            Err("Itemname fehlt".to_string())
        } else {
            Ok(name.to_string())
        }
    }

    fn required_name(rest: &str) -> Result<String, String> {
        Self::item_name(&Arguments::parse(rest, 0))
    }

    fn search(rest: &str) -> Result<Command, String> {
        let args = Arguments::parse(rest, 2);
        let name = Self::item_name(&args)?;

        let quantity_raw = args
            .named("menge")
            .or_else(|| args.named("quantity"))
            .or_else(|| args.numbers.first().map(String::as_str));
        let quantity = match quantity_raw {
            Some(raw) => parse_quantity(raw)?,
            None => 1,
        };

        let margin_raw = args
            .named("marge")
            .or_else(|| args.named("margin"))
            .or_else(|| args.numbers.get(1).map(String::as_str));
        let margin = match margin_raw {
            Some(raw) => Some(
                parse_user_number(raw).ok_or_else(|| format!("Ungültige Marge '{}'", raw))?,
            ),
            None => None,
        };

        Ok(Command::SearchPrice { name, quantity, margin })
    }

    fn propose_price(rest: &str) -> Result<Command, String> {
        let args = Arguments::parse(rest, 1);
        let name = Self::item_name(&args)?;
        let raw = args
            .named("preis")
            .or_else(|| args.named("price"))
            .or_else(|| args.numbers.first().map(String::as_str))
            .ok_or_else(|| "Neuer Preis fehlt".to_string())?;
        let new_price = parse_user_number(raw)
            .filter(|p| *p >= 0.0)
            .ok_or_else(|| format!("Ungültiger Preis '{}'", raw))?;
        Ok(Command::ProposePrice { name, new_price })
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(raw: &str) -> Command {
        match CommandParser::new().parse(raw) {
            ParsedCommand::Command(c) => c,
            other => panic!("expected command for '{}', got {:?}", raw, other),
        }
    }

    #[test]
    fn tokenizer_keeps_quoted_runs() {
        let tokens = tokenize(r#"„Eisen Barren“ 3 "" x"#);
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Eisen Barren", "3", "", "x"]);
        assert!(tokens[0].quoted);
        assert!(!tokens[1].quoted);
    }

    #[test]
    fn user_numbers() {
        assert_eq!(parse_user_number("12,5"), Some(12.5));
        assert_eq!(parse_user_number("20%"), Some(20.0));
        assert_eq!(parse_user_number("10 €"), Some(10.0));
        assert_eq!(parse_user_number("zehn"), None);
    }

    #[test]
    fn refresh_and_help() {
        assert_eq!(command("/update"), Command::Refresh);
        assert_eq!(command("  /HILFE "), Command::Help);
    }

    #[test]
    fn not_a_command() {
        assert_eq!(CommandParser::new().parse("suche Holz"), ParsedCommand::Unknown);
        assert_eq!(CommandParser::new().parse("/tanzen"), ParsedCommand::Unknown);
    }

    #[test]
    fn search_positional_arguments() {
        assert_eq!(
            command("/suche Eisen Barren 3 20"),
            Command::SearchPrice { name: "Eisen Barren".into(), quantity: 3, margin: Some(20.0) }
        );
        assert_eq!(
            command("/suche Holz"),
            Command::SearchPrice { name: "Holz".into(), quantity: 1, margin: None }
        );
    }

    #[test]
    fn search_quoted_name_with_digits() {
        assert_eq!(
            command(r#"/suche "Trank 2" 4"#),
            Command::SearchPrice { name: "Trank 2".into(), quantity: 4, margin: None }
        );
    }

    #[test]
    fn search_named_arguments() {
        assert_eq!(
            command("/suche Holz marge:0"),
            Command::SearchPrice { name: "Holz".into(), quantity: 1, margin: Some(0.0) }
        );
        assert_eq!(
            command("/suche Holz menge:5 marge:7,5"),
            Command::SearchPrice { name: "Holz".into(), quantity: 5, margin: Some(7.5) }
        );
    }

    #[test]
    fn search_rejects_bad_quantity() {
        assert!(matches!(CommandParser::new().parse("/suche Holz 0"), ParsedCommand::Invalid(_)));
        assert!(matches!(CommandParser::new().parse("/suche Holz menge:1,5"), ParsedCommand::Invalid(_)));
        assert!(matches!(CommandParser::new().parse("/suche"), ParsedCommand::Invalid(_)));
    }

    #[test]
    fn single_number_is_item_name() {
        assert_eq!(
            command("/suche 42"),
            Command::SearchPrice { name: "42".into(), quantity: 1, margin: None }
        );
    }

    #[test]
    fn propose_price() {
        assert_eq!(
            command("/preis-vorschlagen Eisen Barren 12,50"),
            Command::ProposePrice { name: "Eisen Barren".into(), new_price: 12.5 }
        );
        assert!(matches!(
            CommandParser::new().parse("/preis-vorschlagen Holz"),
            ParsedCommand::Invalid(_)
        ));
        assert!(matches!(
            CommandParser::new().parse("/preis-vorschlagen Holz preis:-3"),
            ParsedCommand::Invalid(_)
        ));
    }

    #[test]
    fn propose_item_keeps_numbers_in_name() {
        assert_eq!(
            command("/item-vorschlagen Rune 7"),
            Command::ProposeItem { name: "Rune 7".into() }
        );
    }

    #[test]
    fn recipe_and_autocomplete() {
        assert_eq!(command("/rezept Brett"), Command::ShowRecipe { name: "Brett".into() });
        assert_eq!(
            CommandParser::new().parse("/suche eis?"),
            ParsedCommand::Autocomplete("eis".into())
        );
        assert_eq!(
            CommandParser::new().parse("/rezept ?"),
            ParsedCommand::Autocomplete(String::new())
        );
    }
}
