//! Recursive-descent parser: turns the token stream into `ast::Program`.
//!
//! Standard C operator-precedence climb, plus: multi-declarator variable
//! declarations, `for` with optional clauses, `switch`/`case`/`default`
//! fall-through bodies, and struct member/variable declarations.

use crate::ast::{AssignOp, BinOp, Expr, FunctionDecl, Param, Program, Stmt, StructDecl, Switch, SwitchItem, TopLevel, UnOp, VarDeclStmt};
use crate::ctype::{CType, Specifier};
use crate::error::CError;
use crate::intern::{Interner, StringId};
use crate::lexer::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    interner: &'a mut Interner,
    /// Extra top-level items produced when a single declaration statement
    /// expands to several declarators (`int a, b;` at file scope) — only
    /// one `TopLevel` item is returned per `parse_top_level_item` call, so
    /// the rest queue here for `parse_program` to drain first.
    pending: Vec<TopLevel>,
}

/// Parses a complete translation unit.
pub fn parse(tokens: Vec<Token>, interner: &mut Interner) -> Result<Program, CError> {
    Parser::new(tokens, interner).parse_program()
}

impl<'a> Parser<'a> {
    fn new(tokens: Vec<Token>, interner: &'a mut Interner) -> Self {
        Self { tokens, pos: 0, interner, pending: Vec::new() }
    }

    // ----- token-stream plumbing -----------------------------------------

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn line(&self) -> u32 {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek() == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<Token, CError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(CError::parse(format!("expected {kind:?}, found {:?}", self.peek()), self.line()))
        }
    }

    fn eat_ident(&mut self) -> Result<StringId, CError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.interner.intern(&name))
            }
            other => Err(CError::parse(format!("expected identifier, found {other:?}"), self.line())),
        }
    }

    fn is_type_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Void
                | TokenKind::Char
                | TokenKind::Short
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Struct
        )
    }

    // ----- top level -------------------------------------------------------

    fn parse_program(&mut self) -> Result<Program, CError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::Eof) {
            items.push(self.parse_top_level_item()?);
            items.append(&mut self.pending);
        }
        Ok(Program { items })
    }

    fn parse_top_level_item(&mut self) -> Result<TopLevel, CError> {
        let line = self.line();
        if let TokenKind::IncludeLibrary(name) = self.peek().clone() {
            self.advance();
            return Ok(TopLevel::IncludeLibrary { library_name: name, line });
        }
        if self.check(&TokenKind::Struct) && matches!(self.peek_at(2), TokenKind::LBrace) {
            return Ok(TopLevel::StructDecl(self.parse_struct_decl()?));
        }
        let ty = self.parse_type_specifier()?;
        let name = self.eat_ident()?;
        if self.check(&TokenKind::LParen) {
            return Ok(TopLevel::FunctionDecl(self.parse_function_tail(ty, name, line)?));
        }
        let mut decls = self.parse_declarator_tail(ty, name, line)?.into_iter();
        let first = decls.next().expect("parse_declarator_tail always yields at least one declarator");
        self.pending.extend(decls.map(TopLevel::VarDecl));
        Ok(TopLevel::VarDecl(first))
    }

    fn parse_function_tail(&mut self, return_ty: CType, name: StringId, line: u32) -> Result<FunctionDecl, CError> {
        self.eat(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let mut pty = self.parse_type_specifier()?;
                while self.check(&TokenKind::Asterisk) {
                    self.advance();
                    pty = pty.referenced();
                }
                let pname = self.eat_ident()?;
                params.push(Param { ty: pty, name: pname });
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.eat(&TokenKind::RParen)?;
        self.eat(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            self.parse_statement_into(&mut body)?;
        }
        self.eat(&TokenKind::RBrace)?;
        Ok(FunctionDecl { return_ty, name, params, body, line })
    }

    fn parse_struct_decl(&mut self) -> Result<StructDecl, CError> {
        let line = self.line();
        self.eat(&TokenKind::Struct)?;
        let name = self.eat_ident()?;
        self.eat(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let base = self.parse_type_specifier()?;
            loop {
                let mut fty = base.clone();
                while self.check(&TokenKind::Asterisk) {
                    self.advance();
                    fty = fty.referenced();
                }
                let fname = self.eat_ident()?;
                fields.push((fname, fty));
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.eat(&TokenKind::Semicolon)?;
        }
        self.eat(&TokenKind::RBrace)?;
        self.eat(&TokenKind::Semicolon)?;
        Ok(StructDecl { name, fields, line })
    }

    /// Parses the declarator list after a type-specifier and the first
    /// identifier have already been consumed by the caller (top level and
    /// statement contexts both need one token of lookahead to tell a
    /// function declaration from a variable declaration).
    fn parse_declarator_tail(&mut self, base_ty: CType, first_name: StringId, line: u32) -> Result<Vec<VarDeclStmt>, CError> {
        let mut decls = Vec::new();
        let init = if self.check(&TokenKind::Assign) {
            self.advance();
            Some(self.parse_assignment()?)
        } else {
            None
        };
        decls.push(VarDeclStmt { ty: base_ty.clone(), name: first_name, init, line });
        while self.check(&TokenKind::Comma) {
            self.advance();
            let mut ty = base_ty.clone();
            while self.check(&TokenKind::Asterisk) {
                self.advance();
                ty = ty.referenced();
            }
            let name = self.eat_ident()?;
            let init = if self.check(&TokenKind::Assign) {
                self.advance();
                Some(self.parse_assignment()?)
            } else {
                None
            };
            decls.push(VarDeclStmt { ty, name, init, line });
        }
        self.eat(&TokenKind::Semicolon)?;
        Ok(decls)
    }

    // ----- type specifiers --------------------------------------------------

    fn parse_type_specifier(&mut self) -> Result<CType, CError> {
        let line = self.line();
        if self.check(&TokenKind::Struct) {
            self.advance();
            let name = self.eat_ident()?;
            let mut pointer_level = 0;
            while self.check(&TokenKind::Asterisk) {
                self.advance();
                pointer_level += 1;
            }
            return Ok(CType::Struct { name, pointer_level });
        }

        let mut saw_short = false;
        let mut long_count = 0u8;
        let mut saw_signed = false;
        let mut saw_unsigned = false;
        let mut base: Option<Specifier> = None;

        loop {
            match self.peek() {
                TokenKind::Void => {
                    self.advance();
                    base = Some(Specifier::Void);
                }
                TokenKind::Char => {
                    self.advance();
                    base = Some(Specifier::Char);
                }
                TokenKind::Int => {
                    self.advance();
                    base = Some(Specifier::Int);
                }
                TokenKind::Float => {
                    self.advance();
                    base = Some(Specifier::Float);
                }
                TokenKind::Double => {
                    self.advance();
                    base = Some(Specifier::Double);
                }
                TokenKind::Short => {
                    self.advance();
                    saw_short = true;
                }
                TokenKind::Long => {
                    self.advance();
                    long_count += 1;
                }
                TokenKind::Signed => {
                    self.advance();
                    saw_signed = true;
                }
                TokenKind::Unsigned => {
                    self.advance();
                    saw_unsigned = true;
                }
                _ => break,
            }
        }

        if saw_short && long_count > 0 {
            return Err(CError::parse("a type cannot be both 'short' and 'long'", line));
        }
        if saw_signed && saw_unsigned {
            return Err(CError::parse("a type cannot be both 'signed' and 'unsigned'", line));
        }
        if long_count > 2 {
            return Err(CError::parse("too many 'long' specifiers", line));
        }

        let has_modifier = saw_short || long_count > 0 || saw_signed || saw_unsigned;
        let specifier = match (base, saw_short, long_count) {
            (Some(Specifier::Double), false, 1) => Specifier::LongDouble,
            (Some(Specifier::Double), false, 0) => Specifier::Double,
            (Some(Specifier::Float), false, 0) => Specifier::Float,
            (Some(Specifier::Void), false, 0) => Specifier::Void,
            (Some(Specifier::Char), false, 0) => Specifier::Char,
            (Some(Specifier::Int) | None, true, 0) => Specifier::Short,
            (Some(Specifier::Int), false, 0) => Specifier::Int,
            (Some(Specifier::Int) | None, false, 1) => Specifier::Long,
            (Some(Specifier::Int) | None, false, 2) => Specifier::LongLong,
            (None, false, 0) if has_modifier && (saw_signed || saw_unsigned) => {
                return Err(CError::parse("'signed'/'unsigned' require an explicit base type", line));
            }
            _ => return Err(CError::parse("invalid combination of type specifiers", line)),
        };

        let mut ty = CType::scalar(specifier);
        while self.check(&TokenKind::Asterisk) {
            self.advance();
            ty = ty.referenced();
        }
        Ok(ty)
    }

    // ----- statements --------------------------------------------------------

    /// Parses one statement-level construct, pushing one or more `Stmt`s
    /// onto `out` — a multi-declarator variable declaration expands to
    /// several sibling `VarDecl` statements.
    fn parse_statement_into(&mut self, out: &mut Vec<Stmt>) -> Result<(), CError> {
        if self.is_type_start() {
            let line = self.line();
            let ty = self.parse_type_specifier()?;
            let name = self.eat_ident()?;
            for decl in self.parse_declarator_tail(ty, name, line)? {
                out.push(Stmt::VarDecl(decl));
            }
            return Ok(());
        }
        out.push(self.parse_statement()?);
        Ok(())
    }

    fn parse_statement(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        match self.peek() {
            TokenKind::LBrace => self.parse_compound(),
            TokenKind::Semicolon => {
                self.advance();
                Ok(Stmt::Empty { line })
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Break => {
                self.advance();
                self.eat(&TokenKind::Semicolon)?;
                Ok(Stmt::Break { line })
            }
            TokenKind::Continue => {
                self.advance();
                self.eat(&TokenKind::Semicolon)?;
                Ok(Stmt::Continue { line })
            }
            TokenKind::Return => {
                self.advance();
                let expr = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
                self.eat(&TokenKind::Semicolon)?;
                Ok(Stmt::Return { expr, line })
            }
            _ if self.is_type_start() => {
                let mut decls = Vec::new();
                self.parse_statement_into(&mut decls)?;
                if decls.len() == 1 {
                    Ok(decls.remove(0))
                } else {
                    Ok(Stmt::Compound { children: decls, line })
                }
            }
            _ => {
                let expr = self.parse_expression()?;
                self.eat(&TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_compound(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::LBrace)?;
        let mut children = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            self.parse_statement_into(&mut children)?;
        }
        self.eat(&TokenKind::RBrace)?;
        Ok(Stmt::Compound { children, line })
    }

    fn parse_if(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::If)?;
        self.eat(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.eat(&TokenKind::RParen)?;
        let then_body = Box::new(self.parse_statement()?);
        let else_body = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If { condition, then_body, else_body, line })
    }

    fn parse_while(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::While)?;
        self.eat(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.eat(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While { condition, body, line })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::Do)?;
        let body = Box::new(self.parse_statement()?);
        self.eat(&TokenKind::While)?;
        self.eat(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.eat(&TokenKind::RParen)?;
        self.eat(&TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile { condition, body, line })
    }

    fn parse_for(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::For)?;
        self.eat(&TokenKind::LParen)?;
        let setup = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
        self.eat(&TokenKind::Semicolon)?;
        let condition = if self.check(&TokenKind::Semicolon) { None } else { Some(self.parse_expression()?) };
        self.eat(&TokenKind::Semicolon)?;
        let increment = if self.check(&TokenKind::RParen) { None } else { Some(self.parse_expression()?) };
        self.eat(&TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::For { setup, condition, increment, body, line })
    }

    fn parse_switch(&mut self) -> Result<Stmt, CError> {
        let line = self.line();
        self.eat(&TokenKind::Switch)?;
        self.eat(&TokenKind::LParen)?;
        let discriminant = self.parse_expression()?;
        self.eat(&TokenKind::RParen)?;
        self.eat(&TokenKind::LBrace)?;
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.check(&TokenKind::Case) {
                self.advance();
                let expr = self.parse_logical_or()?;
                self.eat(&TokenKind::Colon)?;
                items.push(SwitchItem::CaseLabel(expr));
            } else if self.check(&TokenKind::Default) {
                self.advance();
                self.eat(&TokenKind::Colon)?;
                items.push(SwitchItem::DefaultLabel);
            } else {
                let mut stmts = Vec::new();
                self.parse_statement_into(&mut stmts)?;
                items.extend(stmts.into_iter().map(SwitchItem::Stmt));
            }
        }
        self.eat(&TokenKind::RBrace)?;
        Ok(Stmt::Switch(Switch { discriminant, items, line }))
    }

    // ----- expressions: precedence climb ------------------------------------

    fn parse_expression(&mut self) -> Result<Expr, CError> {
        let line = self.line();
        let first = self.parse_assignment()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.check(&TokenKind::Comma) {
            self.advance();
            children.push(self.parse_assignment()?);
        }
        Ok(Expr::Comma { children, line })
    }

    fn parse_assignment(&mut self) -> Result<Expr, CError> {
        let line = self.line();
        let target = self.parse_logical_or()?;
        let op = match self.peek() {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::AddAssign => AssignOp::AddAssign,
            TokenKind::SubAssign => AssignOp::SubAssign,
            TokenKind::MulAssign => AssignOp::MulAssign,
            TokenKind::DivAssign => AssignOp::DivAssign,
            _ => return Ok(target),
        };
        self.advance();
        let value = self.parse_assignment()?;
        Ok(Expr::Assign { op, target: Box::new(target), value: Box::new(value), line })
    }

    fn parse_logical_or(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_logical_and()?;
        while self.check(&TokenKind::LogOr) {
            let line = self.line();
            self.advance();
            let right = self.parse_logical_and()?;
            left = Expr::Binary { op: BinOp::Or, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_bitor()?;
        while self.check(&TokenKind::LogAnd) {
            let line = self.line();
            self.advance();
            let right = self.parse_bitor()?;
            left = Expr::Binary { op: BinOp::And, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_bitor(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_bitxor()?;
        while self.check(&TokenKind::OrOp) {
            let line = self.line();
            self.advance();
            let right = self.parse_bitxor()?;
            left = Expr::Binary { op: BinOp::BitOr, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_bitxor(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_bitand()?;
        while self.check(&TokenKind::XorOp) {
            let line = self.line();
            self.advance();
            let right = self.parse_bitand()?;
            left = Expr::Binary { op: BinOp::BitXor, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_bitand(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_equality()?;
        while self.check(&TokenKind::Ampersand) {
            let line = self.line();
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::Binary { op: BinOp::BitAnd, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                TokenKind::EqOp => BinOp::Eq,
                TokenKind::NeOp => BinOp::Ne,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_relational()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_shift()?;
        loop {
            let op = match self.peek() {
                TokenKind::LtOp => BinOp::Lt,
                TokenKind::GtOp => BinOp::Gt,
                TokenKind::LeOp => BinOp::Le,
                TokenKind::GeOp => BinOp::Ge,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_shift()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                TokenKind::LeftOp => BinOp::Shl,
                TokenKind::RightOp => BinOp::Shr,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Asterisk => BinOp::Mul,
                TokenKind::DivOp => BinOp::Div,
                TokenKind::ModOp => BinOp::Mod,
                _ => break,
            };
            let line = self.line();
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary { op, left: Box::new(left), right: Box::new(right), line };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, CError> {
        let line = self.line();
        let op = match self.peek() {
            TokenKind::Ampersand => Some(UnOp::AddressOf),
            TokenKind::Asterisk => Some(UnOp::Deref),
            TokenKind::IncOp => Some(UnOp::PreInc),
            TokenKind::DecOp => Some(UnOp::PreDec),
            TokenKind::Plus => Some(UnOp::Plus),
            TokenKind::Minus => Some(UnOp::Minus),
            TokenKind::LogNeg => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary { op, expr: Box::new(expr), line });
        }
        if self.check(&TokenKind::LParen) && self.looks_like_cast() {
            self.advance();
            let ty = self.parse_type_specifier()?;
            self.eat(&TokenKind::RParen)?;
            let expr = self.parse_unary()?;
            return Ok(Expr::Cast { ty, expr: Box::new(expr), line });
        }
        self.parse_postfix()
    }

    /// A `(` starts a cast, not a grouped expression, exactly when the very
    /// next token is a type-specifier keyword — C's `(int)x` vs `(x)` are
    /// disambiguated this way by every C grammar; no separate typedef table
    /// exists in this subset so the lookahead is one token.
    fn looks_like_cast(&self) -> bool {
        matches!(
            self.peek_at(1),
            TokenKind::Void
                | TokenKind::Char
                | TokenKind::Short
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Struct
        )
    }

    fn parse_postfix(&mut self) -> Result<Expr, CError> {
        let mut expr = self.parse_primary()?;
        loop {
            let line = self.line();
            match self.peek() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.eat_ident()?;
                    expr = Expr::FieldAccess { base: Box::new(expr), field, arrow: false, line };
                }
                TokenKind::Arrow => {
                    self.advance();
                    let field = self.eat_ident()?;
                    expr = Expr::FieldAccess { base: Box::new(expr), field, arrow: true, line };
                }
                TokenKind::IncOp => {
                    self.advance();
                    expr = Expr::Unary { op: UnOp::PostInc, expr: Box::new(expr), line };
                }
                TokenKind::DecOp => {
                    self.advance();
                    expr = Expr::Unary { op: UnOp::PostDec, expr: Box::new(expr), line };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, CError> {
        let line = self.line();
        match self.peek().clone() {
            TokenKind::IntConst(v) => {
                self.advance();
                Ok(Expr::IntLit { value: v, line })
            }
            TokenKind::CharConst(v) => {
                self.advance();
                Ok(Expr::CharLit { value: v, line })
            }
            TokenKind::RealConst(v) => {
                self.advance();
                Ok(Expr::FloatLit { value: v, line })
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(Expr::StringLit { value: s, line })
            }
            TokenKind::Ident(name) => {
                self.advance();
                let id = self.interner.intern(&name);
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_assignment()?);
                            if self.check(&TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.eat(&TokenKind::RParen)?;
                    Ok(Expr::Call { name: id, args, line })
                } else {
                    Ok(Expr::Var { name: id, line })
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.eat(&TokenKind::RParen)?;
                Ok(inner)
            }
            other => Err(CError::parse(format!("unexpected token {other:?} in expression"), line)),
        }
    }
}
