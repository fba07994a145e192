//! Recursive-descent parser for the template language.

use super::config::ParserConfig;
use super::error::{ParseError, ParseErrorKind};
use crate::commands::{
    Command, DEFAULT_VARIANT_SEPARATOR, LiteralCommand, SamplingMethod, SequenceCommand,
    VariableAccessCommand, VariableAssignmentCommand, VariantCommand, VariantOption,
    WildcardCommand, WrapCommand,
};

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Where the parser currently is; decides which characters end a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Top level: nothing ends a literal except the start of a construct.
    Top,
    /// Inside a variant option: `|`, the variant end and `$` end literals.
    VariantOption,
    /// Wrapper part of a wrap command: `$$` and the variant end.
    WrapWrapper,
    /// Inner part of a wrap command: the variant end.
    WrapInner,
    /// Value or default of a variable: the variable end.
    VariableBody,
    /// Value of a `name=value` wildcard argument: `,` and `)`.
    WildcardArgument,
}

/// Parsed `N`, `N-`, `-N` or `N-M` range plus optional separator.
#[derive(Debug, Clone, PartialEq)]
struct BoundExpr {
    lower: Option<i64>,
    upper: Option<i64>,
    exact: bool,
    separator: Option<String>,
}

pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    config: &'a ParserConfig,
    wrap_start: String,
    /// Open `[` count in the current variant option; `|` inside brackets
    /// does not split options.
    bracket_depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, config: &'a ParserConfig) -> Self {
        Self {
            src,
            pos: 0,
            config,
            wrap_start: config.wrap_start(),
            bracket_depth: 0,
        }
    }

    /// Parse the whole input into a single command.
    pub(crate) fn parse(mut self) -> ParseResult<Command> {
        let tokens = self.parse_prompt(Scope::Top)?;
        debug_assert!(self.at_end(), "top-level parse must consume all input");
        Ok(build_command(tokens))
    }

    // =========================================================================
    // Cursor helpers
    // =========================================================================

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        !s.is_empty() && self.rest().starts_with(s)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.src, offset)
    }

    // =========================================================================
    // Prompt / chunk level
    // =========================================================================

    fn parse_prompt(&mut self, scope: Scope) -> ParseResult<Vec<Command>> {
        let mut tokens = Vec::new();

        while !self.at_end() {
            if self.skip_comment()? {
                continue;
            }

            if self.starts_with(&self.wrap_start) {
                tokens.push(self.parse_wrap()?);
            } else if self.starts_with(&self.config.variable_start) {
                tokens.push(self.parse_variable()?);
            } else if self.starts_with(&self.config.variant_start) {
                tokens.push(self.parse_variant()?);
            } else if self.starts_with(&self.config.wildcard_wrap) {
                match self.try_parse_wildcard()? {
                    Some(wildcard) => tokens.push(wildcard),
                    None => {
                        // Not a wildcard: keep the wrap as text.
                        let wrap = self.config.wildcard_wrap.clone();
                        self.advance(wrap.len());
                        tokens.push(Command::literal(wrap));
                    }
                }
            } else if self.at_terminator(scope) {
                break;
            } else {
                tokens.push(self.parse_literal(scope));
            }
        }

        Ok(merge_literals(tokens))
    }

    fn at_terminator(&self, scope: Scope) -> bool {
        match scope {
            Scope::Top => false,
            Scope::VariantOption => {
                (self.starts_with("|") && self.bracket_depth == 0)
                    || self.starts_with("$")
                    || self.at_variant_end()
            }
            Scope::WrapWrapper => self.starts_with("$$") || self.at_variant_end(),
            Scope::WrapInner => self.at_variant_end(),
            Scope::VariableBody => self.starts_with(&self.config.variable_end),
            Scope::WildcardArgument => self.starts_with(",") || self.starts_with(")"),
        }
    }

    fn at_variant_end(&self) -> bool {
        self.starts_with(&self.config.variant_end)
    }

    fn at_construct_start(&self) -> bool {
        self.starts_with(&self.wrap_start)
            || self.starts_with(&self.config.variable_start)
            || self.starts_with(&self.config.variant_start)
            || self.starts_with(&self.config.wildcard_wrap)
    }

    fn at_comment_start(&self) -> bool {
        self.starts_with("#") || self.starts_with("//") || self.starts_with("/*")
    }

    /// Skip a comment if one starts here. Line comments leave the newline.
    fn skip_comment(&mut self) -> ParseResult<bool> {
        if self.starts_with("#") || self.starts_with("//") {
            let len = self.rest().find('\n').unwrap_or(self.rest().len());
            self.advance(len);
            return Ok(true);
        }
        if self.starts_with("/*") {
            let start = self.pos;
            match self.rest()[2..].find("*/") {
                Some(end) => {
                    self.advance(2 + end + 2);
                    return Ok(true);
                }
                None => return Err(self.error(ParseErrorKind::UnterminatedComment, start)),
            }
        }
        Ok(false)
    }

    fn parse_literal(&mut self, scope: Scope) -> Command {
        let start = self.pos;

        // The first character is never a boundary, otherwise the caller
        // would have dispatched elsewhere.
        self.bump_literal_char(scope);

        while !self.at_end() {
            if self.at_construct_start() || self.at_comment_start() || self.at_terminator(scope) {
                break;
            }
            self.bump_literal_char(scope);
        }

        Command::literal(&self.src[start..self.pos])
    }

    fn bump_literal_char(&mut self, scope: Scope) {
        let c = self.bump();
        if scope != Scope::VariantOption {
            return;
        }
        match c {
            Some('[') => self.bracket_depth += 1,
            Some(']') => self.bracket_depth = self.bracket_depth.saturating_sub(1),
            _ => {}
        }
    }

    // =========================================================================
    // Variants
    // =========================================================================

    fn parse_variant(&mut self) -> ParseResult<Command> {
        let start = self.pos;
        self.advance(self.config.variant_start.len());

        let sampling_method = self.parse_sigil();
        let bound = self.try_parse_bound_expr()?;

        let outer_depth = self.bracket_depth;
        let mut options = Vec::new();
        loop {
            self.bracket_depth = 0;
            let weight = self.try_parse_weight().unwrap_or(1.0);
            let tokens = self.parse_prompt(Scope::VariantOption)?;
            options.push(VariantOption::new(build_command(tokens), weight));

            if self.at_end() {
                return Err(self.error(ParseErrorKind::UnterminatedVariant, start));
            }
            if self.starts_with("|") {
                self.advance(1);
                continue;
            }
            if self.at_variant_end() {
                self.advance(self.config.variant_end.len());
                self.bracket_depth = outer_depth;
                break;
            }
            // Only '$' remains as a terminator here.
            return Err(self.error(ParseErrorKind::UnexpectedDollar, self.pos));
        }

        let num_options = options.len() as i64;
        let (min_bound, max_bound, separator) = match bound {
            None => (1, 1, DEFAULT_VARIANT_SEPARATOR.to_string()),
            Some(expr) => {
                let (lo, hi) = if expr.exact {
                    let n = expr.lower.unwrap_or(1);
                    (n, n)
                } else {
                    (expr.lower.unwrap_or(1), expr.upper.unwrap_or(num_options))
                };
                let separator = expr
                    .separator
                    .unwrap_or_else(|| DEFAULT_VARIANT_SEPARATOR.to_string());
                (lo, hi, separator)
            }
        };

        Ok(VariantCommand::new(options, min_bound, max_bound, separator)
            .with_sampling_method(sampling_method)
            .into())
    }

    fn parse_sigil(&mut self) -> Option<SamplingMethod> {
        let method = self.peek().and_then(SamplingMethod::from_sigil)?;
        self.bump();
        Some(method)
    }

    /// Parse `range $$ [separator $$]` if present, restoring the cursor if not.
    fn try_parse_bound_expr(&mut self) -> ParseResult<Option<BoundExpr>> {
        let start = self.pos;
        let run_len = self
            .rest()
            .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == ' ' || c == '\t'))
            .unwrap_or(self.rest().len());
        let run = &self.rest()[..run_len];

        if !run.chars().any(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        self.advance(run_len);
        if !self.starts_with("$$") {
            self.pos = start;
            return Ok(None);
        }

        let mut expr = parse_range(run).ok_or_else(|| {
            self.error(
                ParseErrorKind::InvalidBoundExpression(run.trim().to_string()),
                start,
            )
        })?;
        self.advance(2);

        // Optional custom separator terminated by another "$$".
        let after_range = self.pos;
        let sep_len = self
            .rest()
            .find(|c: char| c == '$' || c == '{' || c == '}')
            .unwrap_or(self.rest().len());
        let separator = &self.rest()[..sep_len];
        self.advance(sep_len);
        if self.starts_with("$$") {
            expr.separator = Some(separator.to_string());
            self.advance(2);
        } else if self.starts_with("$") && !self.starts_with(&self.config.variable_start) {
            return Err(self.error(ParseErrorKind::DollarSeparator, self.pos));
        } else {
            self.pos = after_range;
        }

        Ok(Some(expr))
    }

    /// Parse a `weight::` prefix, restoring the cursor if there is none.
    fn try_parse_weight(&mut self) -> Option<f64> {
        let start = self.pos;
        self.skip_whitespace();
        let num_len = self
            .rest()
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(self.rest().len());
        let number = &self.rest()[..num_len];
        if number.is_empty() || !number.chars().any(|c| c.is_ascii_digit()) {
            self.pos = start;
            return None;
        }
        self.advance(num_len);
        self.skip_whitespace();
        if !self.starts_with("::") {
            self.pos = start;
            return None;
        }
        match number.parse::<f64>() {
            Ok(weight) => {
                self.advance(2);
                Some(weight)
            }
            Err(_) => {
                self.pos = start;
                None
            }
        }
    }

    // =========================================================================
    // Wildcards
    // =========================================================================

    /// Parse `__[sigil]path[(k=v,...)]__`, or return `None` with the cursor
    /// untouched if the text here is not a wildcard.
    fn try_parse_wildcard(&mut self) -> ParseResult<Option<Command>> {
        let start = self.pos;
        let wrap = self.config.wildcard_wrap.as_str();
        self.advance(wrap.len());

        let sampling_method = self.parse_sigil();

        let path_start = self.pos;
        while !self.at_end() && !self.starts_with(wrap) && !self.starts_with("(") {
            if self.starts_with(&self.config.variable_start) {
                // `${var}` segments are substituted at sampling time.
                match self.rest().find(self.config.variable_end.as_str()) {
                    Some(end) => {
                        self.advance(end + self.config.variable_end.len());
                        continue;
                    }
                    None => break,
                }
            }
            match self.peek() {
                Some(c) if is_wildcard_path_char(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
        let path = self.src[path_start..self.pos].to_string();

        if path.is_empty() {
            self.pos = start;
            return Ok(None);
        }

        let mut variables = Vec::new();
        if self.starts_with("(") {
            match self.try_parse_wildcard_arguments()? {
                Some(vars) => variables = vars,
                None => {
                    self.pos = start;
                    return Ok(None);
                }
            }
        }

        if !self.starts_with(wrap) {
            self.pos = start;
            return Ok(None);
        }
        self.advance(wrap.len());

        Ok(Some(
            WildcardCommand::new(path)
                .with_variables(variables)
                .with_sampling_method(sampling_method)
                .into(),
        ))
    }

    /// Parse `(name=value, ...)`. Returns `None` if the parenthesis does not
    /// open an argument list at all.
    fn try_parse_wildcard_arguments(&mut self) -> ParseResult<Option<Vec<(String, Command)>>> {
        let open = self.pos;
        self.advance(1);

        let mut variables = Vec::new();
        loop {
            self.skip_whitespace();
            let name = self.scan_identifier();
            self.skip_whitespace();
            if name.is_empty() || !self.starts_with("=") {
                if variables.is_empty() {
                    self.pos = open;
                    return Ok(None);
                }
                return Err(self.error(
                    ParseErrorKind::InvalidWildcardArguments(format!(
                        "expected 'name=value' after ',' (found '{}')",
                        name
                    )),
                    self.pos,
                ));
            }
            self.advance(1);
            self.skip_whitespace();
            let value = build_command(self.parse_prompt(Scope::WildcardArgument)?);
            variables.push((name, value));

            if self.starts_with(",") {
                self.advance(1);
                continue;
            }
            if self.starts_with(")") {
                self.advance(1);
                return Ok(Some(variables));
            }
            return Err(self.error(
                ParseErrorKind::InvalidWildcardArguments("missing ')'".to_string()),
                open,
            ));
        }
    }

    // =========================================================================
    // Variables
    // =========================================================================

    fn scan_identifier(&mut self) -> String {
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(self.rest().len());
        let ident = self.rest()[..len].to_string();
        self.advance(len);
        ident
    }

    fn parse_variable(&mut self) -> ParseResult<Command> {
        let start = self.pos;
        self.advance(self.config.variable_start.len());
        self.skip_whitespace();

        let name = self.scan_identifier();
        self.skip_whitespace();
        if name.is_empty() {
            let found: String = self.rest().chars().take(1).collect();
            return Err(self.error(ParseErrorKind::InvalidVariableName(found), self.pos));
        }

        if self.starts_with(&self.config.variable_end) {
            self.advance(self.config.variable_end.len());
            return Ok(VariableAccessCommand::new(name, None).into());
        }

        let (immediate, is_default) = if self.starts_with("=!") {
            self.advance(2);
            (true, false)
        } else if self.starts_with("=") {
            self.advance(1);
            (false, false)
        } else if self.starts_with(":") {
            self.advance(1);
            (false, true)
        } else if self.at_end() {
            return Err(self.error(ParseErrorKind::UnterminatedVariable, start));
        } else {
            let found: String = self.rest().chars().take(1).collect();
            return Err(self.error(
                ParseErrorKind::InvalidVariableName(format!("{}{}", name, found)),
                start,
            ));
        };

        self.skip_whitespace();
        let value = build_command(self.parse_prompt(Scope::VariableBody)?);
        if !self.starts_with(&self.config.variable_end) {
            return Err(self.error(ParseErrorKind::UnterminatedVariable, start));
        }
        self.advance(self.config.variable_end.len());

        if is_default {
            Ok(VariableAccessCommand::new(name, Some(value)).into())
        } else {
            Ok(VariableAssignmentCommand::new(name, value, immediate).into())
        }
    }

    // =========================================================================
    // Wrap
    // =========================================================================

    fn parse_wrap(&mut self) -> ParseResult<Command> {
        let start = self.pos;
        self.advance(self.wrap_start.len());

        let wrapper = build_command(self.parse_prompt(Scope::WrapWrapper)?);
        if self.at_end() {
            return Err(self.error(ParseErrorKind::UnterminatedWrap, start));
        }
        if !self.starts_with("$$") {
            return Err(self.error(ParseErrorKind::MissingWrapSeparator, self.pos));
        }
        self.advance(2);

        let inner = build_command(self.parse_prompt(Scope::WrapInner)?);
        if !self.at_variant_end() {
            return Err(self.error(ParseErrorKind::UnterminatedWrap, start));
        }
        self.advance(self.config.variant_end.len());

        Ok(WrapCommand::new(wrapper, inner).into())
    }
}

fn is_wildcard_path_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | '\\' | '*' | '?' | '.' | '[' | ']' | '!')
}

/// Parse `N`, `N-`, `-N` or `N-M` (whitespace tolerated).
fn parse_range(run: &str) -> Option<BoundExpr> {
    let compact: String = run.chars().filter(|c| !c.is_whitespace()).collect();
    let parse_num = |s: &str| s.parse::<i64>().ok();

    match compact.split_once('-') {
        None => {
            let n = parse_num(&compact)?;
            Some(BoundExpr {
                lower: Some(n),
                upper: Some(n),
                exact: true,
                separator: None,
            })
        }
        Some((lo, hi)) => {
            if hi.contains('-') {
                return None;
            }
            let lower = if lo.is_empty() { None } else { Some(parse_num(lo)?) };
            let upper = if hi.is_empty() { None } else { Some(parse_num(hi)?) };
            if lower.is_none() && upper.is_none() {
                return None;
            }
            Some(BoundExpr {
                lower,
                upper,
                exact: false,
                separator: None,
            })
        }
    }
}

/// Join adjacent plain literals into one.
fn merge_literals(tokens: Vec<Command>) -> Vec<Command> {
    let mut merged: Vec<Command> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Command::Literal(LiteralCommand {
            literal,
            sampling_method: None,
        }) = &token
        {
            if let Some(Command::Literal(prev)) = merged.last_mut() {
                if prev.sampling_method.is_none() {
                    prev.literal.push_str(literal);
                    continue;
                }
            }
        }
        merged.push(token);
    }
    merged
}

/// Collapse a token list into a single command.
fn build_command(mut tokens: Vec<Command>) -> Command {
    match tokens.len() {
        0 => Command::literal(""),
        1 => tokens.remove(0),
        _ => SequenceCommand::new(tokens).into(),
    }
}
