//! Parser for the scene language.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::circuit::Position;
use crate::components::{ComponentKind, DiodeDirection, Switch};
use crate::error::{CircuitError, Result};

/// Parser for scene descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser, reading the first token eagerly.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire scene description.
    pub fn parse(&mut self) -> Result<SceneAst> {
        let mut ast = SceneAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(CircuitError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(CircuitError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(CircuitError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<f64> {
        let line = self.current.line;
        let tok = self.expect(TokenKind::Number).map_err(|_| {
            CircuitError::parse(line, format!("expected {}, got {:?}", what, self.current.text))
        })?;
        parse_value(&tok.text)
            .ok_or_else(|| CircuitError::parse(line, format!("invalid number: {}", tok.text)))
    }

    fn parse_directive(&mut self, ast: &mut SceneAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".wire" => {
                let mut names = Vec::new();
                while !self.at_line_end() {
                    names.push(self.expect(TokenKind::Identifier)?.text);
                }
                if names.len() < 2 {
                    return Err(CircuitError::parse(line, ".wire needs at least two components"));
                }
                for pair in names.windows(2) {
                    ast.wires.push(WireDef {
                        start: pair[0].clone(),
                        end: pair[1].clone(),
                        line,
                    });
                }
            }
            ".set" => {
                if self.at_line_end() {
                    return Err(CircuitError::parse(line, ".set needs at least one key=value"));
                }
                while !self.at_line_end() {
                    let key = self.expect(TokenKind::Identifier)?.text;
                    self.expect(TokenKind::Equals)?;
                    let value = self.expect_number("setting value")?;
                    ast.settings.insert(key.to_lowercase(), value);
                }
            }
            _ => {
                return Err(CircuitError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ComponentKind::from_keyword(&keyword).ok_or_else(|| {
            CircuitError::UnknownComponentType {
                component_type: keyword.clone(),
                line,
            }
        })?;

        let name = self.expect(TokenKind::Identifier)?.text;
        let x = self.expect_number("x coordinate")?;
        let y = self.expect_number("y coordinate")?;

        let mut def = ComponentDef {
            kind,
            name,
            position: Position::new(x, y),
            value: None,
            direction: None,
            active: None,
            line,
        };

        while !self.at_line_end() {
            match self.current.kind {
                TokenKind::Number => {
                    let value = self.expect_number("value")?;
                    self.apply_value(&mut def, value)?;
                }
                TokenKind::Identifier => {
                    let word = self.current.text.clone();
                    self.advance()?;

                    if self.current.kind == TokenKind::Equals {
                        self.advance()?;
                        self.parse_param(&mut def, &word)?;
                    } else {
                        self.apply_flag(&mut def, &word)?;
                    }
                }
                _ => {
                    return Err(CircuitError::invalid_component(
                        &def.name,
                        line,
                        format!("unexpected token {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(def)
    }

    /// `value=220`, `dir=reverse`, `state=on`
    fn parse_param(&mut self, def: &mut ComponentDef, key: &str) -> Result<()> {
        match key.to_lowercase().as_str() {
            "value" | "v" => {
                let value = self.expect_number("value")?;
                self.apply_value(def, value)
            }
            "dir" | "direction" | "state" => {
                let word = self.expect(TokenKind::Identifier)?.text;
                self.apply_flag(def, &word)
            }
            other => Err(CircuitError::invalid_component(
                &def.name,
                def.line,
                format!("unknown parameter '{}'", other),
            )),
        }
    }

    fn apply_value(&self, def: &mut ComponentDef, value: f64) -> Result<()> {
        if !def.kind.has_value() {
            return Err(CircuitError::invalid_component(
                &def.name,
                def.line,
                format!("{} does not take a value", def.kind),
            ));
        }
        def.value = Some(value);
        Ok(())
    }

    fn apply_flag(&self, def: &mut ComponentDef, word: &str) -> Result<()> {
        match def.kind {
            ComponentKind::Diode => {
                def.direction = Some(DiodeDirection::from_keyword(word).ok_or_else(|| {
                    CircuitError::invalid_component(
                        &def.name,
                        def.line,
                        format!("expected forward or reverse, got '{}'", word),
                    )
                })?);
            }
            ComponentKind::Switch => {
                def.active = Some(Switch::state_from_keyword(word).ok_or_else(|| {
                    CircuitError::invalid_component(
                        &def.name,
                        def.line,
                        format!("expected on or off, got '{}'", word),
                    )
                })?);
            }
            _ => {
                return Err(CircuitError::invalid_component(
                    &def.name,
                    def.line,
                    format!("unexpected flag '{}' for {}", word, def.kind),
                ));
            }
        }
        Ok(())
    }
}
