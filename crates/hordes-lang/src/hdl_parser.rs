//! Recursive-descent parser for the Hordes Definition Language.
//!
//! Consumes tokens from [`hdl_lexer`](crate::hdl_lexer) and builds a
//! [`Program`]. The parser owns nothing but its token cursor, so every call
//! to [`parse`] is independent.

use std::mem;

use crate::ast::{
    ArithOp, Assign, Cond, Decl, Expr, ForLoop, ForSource, IfElse, Line, MethodCall, Path, Print,
    Program, RelOp, Segment,
};
use crate::error::{HdlError, Pos};
use crate::hdl_lexer::{Located, Token, lex};

/// Lex and parse a complete source text.
pub fn parse(source: &str) -> Result<Program, HdlError> {
    parse_program(lex(source)?)
}

/// Parse an already lexed token stream.
pub fn parse_program(tokens: Vec<Located<Token>>) -> Result<Program, HdlError> {
    let mut parser = Parser::new(tokens);
    let mut lines = Vec::new();
    while !matches!(parser.peek(), Token::Eof) {
        lines.push(parser.line()?);
    }
    Ok(Program { lines })
}

struct Parser {
    tokens: Vec<Located<Token>>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Located<Token>>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|t| &t.value)
            .unwrap_or(&Token::Eof)
    }

    fn peek_at(&self, ahead: usize) -> &Token {
        self.tokens
            .get(self.pos + ahead)
            .map(|t| &t.value)
            .unwrap_or(&Token::Eof)
    }

    /// Position of the current token.
    fn here(&self) -> Pos {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(Located::pos)
            .unwrap_or_default()
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at(&self, expected: &Token) -> bool {
        mem::discriminant(self.peek()) == mem::discriminant(expected)
    }

    fn expect(&mut self, expected: &Token) -> Result<Pos, HdlError> {
        if self.at(expected) {
            let pos = self.here();
            self.advance();
            Ok(pos)
        } else {
            Err(self.err())
        }
    }

    /// Syntax error on the current token.
    fn err(&self) -> HdlError {
        let tok = self.peek();
        HdlError::Syntax {
            kind: tok.kind_name(),
            value: tok.to_string(),
            pos: self.here(),
        }
    }

    fn ident(&mut self) -> Result<(String, Pos), HdlError> {
        let pos = self.here();
        match self.peek() {
            Token::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok((name, pos))
            }
            _ => Err(self.err()),
        }
    }

    fn int(&mut self) -> Result<i64, HdlError> {
        match *self.peek() {
            Token::Int(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.err()),
        }
    }

    fn line(&mut self) -> Result<Line, HdlError> {
        match self.peek() {
            Token::TypeName(_) => self.declaration().map(Line::Decl),
            Token::Ident(_) => self.path_statement(),
            Token::Print => self.print().map(Line::Print),
            Token::For => self.for_loop().map(Line::For),
            Token::If => self.if_else().map(Line::If),
            _ => Err(self.err()),
        }
    }

    /// Lines up to (not including) a token matching one of `stops`; may be
    /// empty.
    fn block(&mut self, stops: &[Token]) -> Result<Vec<Line>, HdlError> {
        let mut lines = Vec::new();
        loop {
            if stops.iter().any(|stop| self.at(stop)) {
                return Ok(lines);
            }
            lines.push(self.line()?);
        }
    }

    fn declaration(&mut self) -> Result<Decl, HdlError> {
        let pos = self.here();
        let kind = match *self.peek() {
            Token::TypeName(kind) => kind,
            _ => return Err(self.err()),
        };
        self.advance();
        let (name, _) = self.ident()?;
        let dimension = if self.at(&Token::LBracket) {
            self.advance();
            self.expect(&Token::RBracket)?;
            Some(0)
        } else {
            None
        };
        self.expect(&Token::Semicolon)?;
        Ok(Decl {
            kind,
            name,
            dimension,
            pos,
        })
    }

    /// Assignment or method call; both start with an attribute path.
    fn path_statement(&mut self) -> Result<Line, HdlError> {
        let pos = self.here();
        let mut target = self.path()?;
        match self.peek() {
            Token::Assign => {
                self.advance();
                let value = self.expr()?;
                self.expect(&Token::Semicolon)?;
                Ok(Line::Assign(Assign { target, value, pos }))
            }
            Token::LParen => {
                // The last step of the path names the method.
                let method = match target.attrs.pop() {
                    Some(seg) if seg.index.is_none() => seg,
                    _ => return Err(self.err()),
                };
                self.advance();
                let args = self.args()?;
                self.expect(&Token::RParen)?;
                self.expect(&Token::Semicolon)?;
                Ok(Line::MethodCall(MethodCall {
                    target,
                    method: method.name,
                    method_pos: method.pos,
                    args,
                    pos,
                }))
            }
            _ => Err(self.err()),
        }
    }

    fn print(&mut self) -> Result<Print, HdlError> {
        let pos = self.expect(&Token::Print)?;
        let args = self.args()?;
        self.expect(&Token::Semicolon)?;
        Ok(Print { args, pos })
    }

    fn for_loop(&mut self) -> Result<ForLoop, HdlError> {
        let pos = self.expect(&Token::For)?;
        self.expect(&Token::Each)?;

        let (binding, source) =
            if matches!(self.peek(), Token::Ident(_)) && matches!(self.peek_at(1), Token::In) {
                let (binding, _) = self.ident()?;
                self.advance();
                self.expect(&Token::LParen)?;
                let start = self.int()?;
                self.expect(&Token::Comma)?;
                let end = self.int()?;
                self.expect(&Token::RParen)?;
                (binding, ForSource::Range { start, end })
            } else {
                let path = self.path()?;
                self.expect(&Token::As)?;
                let (binding, _) = self.ident()?;
                (binding, ForSource::Elements(path))
            };

        self.expect(&Token::Colon)?;
        let body = self.block(&[Token::End])?;
        self.expect(&Token::End)?;
        self.expect(&Token::For)?;
        Ok(ForLoop {
            binding,
            source,
            body,
            pos,
        })
    }

    fn if_else(&mut self) -> Result<IfElse, HdlError> {
        let pos = self.expect(&Token::If)?;
        let cond = self.cond()?;
        self.expect(&Token::Colon)?;
        let then_block = self.block(&[Token::Else, Token::End])?;
        let else_block = if self.at(&Token::Else) {
            self.advance();
            self.expect(&Token::Colon)?;
            Some(self.block(&[Token::End])?)
        } else {
            None
        };
        self.expect(&Token::End)?;
        self.expect(&Token::If)?;
        Ok(IfElse {
            cond,
            then_block,
            else_block,
            pos,
        })
    }

    fn cond(&mut self) -> Result<Cond, HdlError> {
        let mut lhs = self.cond_and()?;
        while self.at(&Token::Or) {
            self.advance();
            let rhs = self.cond_and()?;
            lhs = Cond::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn cond_and(&mut self) -> Result<Cond, HdlError> {
        let mut lhs = self.cond_not()?;
        while self.at(&Token::And) {
            self.advance();
            let rhs = self.cond_not()?;
            lhs = Cond::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn cond_not(&mut self) -> Result<Cond, HdlError> {
        if self.at(&Token::Not) {
            self.advance();
            let inner = self.cond_not()?;
            return Ok(Cond::Not(Box::new(inner)));
        }
        self.cond_atom()
    }

    fn cond_atom(&mut self) -> Result<Cond, HdlError> {
        if !self.at(&Token::LParen) {
            return self.comparison();
        }
        // `(a + b) > c` and `(a > b)` both open with a parenthesis: try the
        // comparison first, then fall back to a grouped condition.
        let mark = self.pos;
        if let Ok(cmp) = self.comparison() {
            return Ok(cmp);
        }
        self.pos = mark;
        self.advance();
        let inner = self.cond()?;
        self.expect(&Token::RParen)?;
        Ok(inner)
    }

    fn comparison(&mut self) -> Result<Cond, HdlError> {
        let lhs = self.expr()?;
        let pos = self.here();
        let op = match self.peek() {
            Token::Eq => RelOp::Eq,
            Token::Ne => RelOp::Ne,
            Token::Gt => RelOp::Gt,
            Token::Ge => RelOp::Ge,
            Token::Lt => RelOp::Lt,
            Token::Le => RelOp::Le,
            _ => return Err(self.err()),
        };
        self.advance();
        let rhs = self.expr()?;
        Ok(Cond::Compare { lhs, op, rhs, pos })
    }

    fn args(&mut self) -> Result<Vec<Expr>, HdlError> {
        let mut args = vec![self.expr()?];
        while self.at(&Token::Comma) {
            self.advance();
            args.push(self.expr()?);
        }
        Ok(args)
    }

    fn expr(&mut self) -> Result<Expr, HdlError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            let pos = self.here();
            self.advance();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                pos,
            };
        }
    }

    fn term(&mut self) -> Result<Expr, HdlError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Token::Star => ArithOp::Mul,
                Token::Slash => ArithOp::Div,
                _ => return Ok(lhs),
            };
            let pos = self.here();
            self.advance();
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                pos,
            };
        }
    }

    fn factor(&mut self) -> Result<Expr, HdlError> {
        let pos = self.here();
        match self.peek() {
            Token::Int(n) => {
                let n = *n;
                self.advance();
                Ok(Expr::Int(n, pos))
            }
            Token::Real(r) => {
                let r = *r;
                self.advance();
                Ok(Expr::Real(r, pos))
            }
            Token::Str(s) => {
                let s = s.clone();
                self.advance();
                Ok(Expr::Str(s, pos))
            }
            Token::Ident(_) => self.path().map(Expr::Path),
            Token::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            _ => Err(self.err()),
        }
    }

    fn path(&mut self) -> Result<Path, HdlError> {
        let root = self.segment()?;
        let mut attrs = Vec::new();
        while self.at(&Token::Dot) {
            self.advance();
            attrs.push(self.segment()?);
        }
        Ok(Path { root, attrs })
    }

    fn segment(&mut self) -> Result<Segment, HdlError> {
        let (name, pos) = self.ident()?;
        let index = if self.at(&Token::LBracket) {
            self.advance();
            let index = self.int()?;
            self.expect(&Token::RBracket)?;
            Some(index)
        } else {
            None
        };
        Ok(Segment { name, index, pos })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecordKind;

    fn first_line(source: &str) -> Line {
        let program = parse(source).expect("parse");
        program.lines.into_iter().next().expect("one line")
    }

    #[test]
    fn parse_declarations() {
        let program = parse("Map m;\nHorde hs[];").expect("parse");
        assert_eq!(program.lines.len(), 2);
        match &program.lines[0] {
            Line::Decl(d) => {
                assert_eq!(d.kind, RecordKind::Map);
                assert_eq!(d.name, "m");
                assert_eq!(d.dimension, None);
                assert_eq!(d.pos, Pos::new(1, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(&program.lines[1], Line::Decl(d) if d.dimension == Some(0)));
    }

    #[test]
    fn parse_indexed_assignment() {
        match first_line("m.hordes[1].x = 4;") {
            Line::Assign(a) => {
                assert_eq!(a.target.root.name, "m");
                assert_eq!(a.target.attrs.len(), 2);
                assert_eq!(a.target.attrs[0].index, Some(1));
                assert_eq!(a.target.to_string(), "m.hordes[1].x");
                assert!(matches!(a.value, Expr::Int(4, _)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_method_call() {
        match first_line("m.hordes.add(h1, h2);") {
            Line::MethodCall(c) => {
                assert_eq!(c.method, "add");
                assert_eq!(c.target.to_string(), "m.hordes");
                assert_eq!(c.args.len(), 2);
                assert_eq!(c.method_pos, Pos::new(1, 10));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn method_call_needs_a_receiver() {
        assert!(matches!(parse("add(h);"), Err(HdlError::Syntax { .. })));
    }

    #[test]
    fn parse_arithmetic_precedence() {
        match first_line("h.x = 1 + 2 * (3 - 4);") {
            Line::Assign(a) => match a.value {
                Expr::Binary {
                    op: ArithOp::Add,
                    rhs,
                    ..
                } => assert!(matches!(*rhs, Expr::Binary { op: ArithOp::Mul, .. })),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_for_loops() {
        let src = "for each i in (0, 3):\n print i;\nend for\nfor each m.hordes as h:\n print h;\nend for";
        let program = parse(src).expect("parse");
        match &program.lines[0] {
            Line::For(f) => {
                assert_eq!(f.binding, "i");
                assert_eq!(f.source, ForSource::Range { start: 0, end: 3 });
                assert_eq!(f.body.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        match &program.lines[1] {
            Line::For(f) => {
                assert_eq!(f.binding, "h");
                assert!(matches!(&f.source, ForSource::Elements(p) if p.to_string() == "m.hordes"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_if_else_with_conditions() {
        let src = "if not a.x > 1 and (b.y == 2 or (c.x + 1) < 3):\n print 1;\nelse:\n print 2;\nend if";
        match first_line(src) {
            Line::If(i) => {
                assert!(i.else_block.is_some());
                match i.cond {
                    Cond::And(lhs, rhs) => {
                        assert!(matches!(*lhs, Cond::Not(_)));
                        assert!(matches!(*rhs, Cond::Or(_, _)));
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn or_binds_looser_than_and() {
        match first_line("if a.x == 1 or a.x == 2 and a.y == 3:\n print a;\nend if") {
            Line::If(i) => match i.cond {
                Cond::Or(_, rhs) => assert!(matches!(*rhs, Cond::And(_, _))),
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_blocks_are_allowed() {
        let program = parse("for each i in (0, 2):\nend for").expect("parse");
        let Line::For(for_loop) = &program.lines[0] else {
            panic!("expected a for loop");
        };
        assert!(for_loop.body.is_empty());

        let program = parse("Map m;\nif m.width == 0:\nelse:\nend if").expect("parse");
        let Line::If(if_else) = &program.lines[1] else {
            panic!("expected an if");
        };
        assert!(if_else.then_block.is_empty());
        assert_eq!(if_else.else_block.as_deref().map(<[Line]>::len), Some(0));
    }

    #[test]
    fn unclosed_block_is_a_syntax_error() {
        let err = parse("for each i in (0, 2):\n").unwrap_err();
        assert!(matches!(err, HdlError::Syntax { kind: "end of input", .. }), "{err}");
    }

    #[test]
    fn syntax_error_reports_token() {
        let err = parse("Map m;\nm.width = ;").unwrap_err();
        assert_eq!(
            err,
            HdlError::Syntax {
                kind: "symbol",
                value: ";".into(),
                pos: Pos::new(2, 11),
            }
        );
    }

    #[test]
    fn missing_end_reports_eof() {
        let err = parse("if a.x == 1:\n print a;\n").unwrap_err();
        assert!(matches!(err, HdlError::Syntax { kind: "end of input", .. }));
    }
}
