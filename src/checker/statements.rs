//! Statement checking

use super::typed::{TypedDeclarator, TypedExpr, TypedStmt};
use super::types::Type;
use super::{Checker, TypeError};
use crate::parser::ast::{Declarator, Expr, SourceLocation, Stmt};

impl Checker<'_> {
    /// Check statements in the current scope
    pub(super) fn check_block(&mut self, stmts: &[Stmt]) -> Result<Vec<TypedStmt>, TypeError> {
        stmts.iter().map(|stmt| self.check_statement(stmt)).collect()
    }

    /// Check statements in a fresh nested scope
    fn check_scoped_block(&mut self, stmts: &[Stmt]) -> Result<Vec<TypedStmt>, TypeError> {
        self.scopes.push_scope();
        let result = self.check_block(stmts);
        self.scopes.pop_scope();
        result
    }

    /// Check a loop body; `break` and `continue` are legal inside it
    fn check_loop_body(&mut self, stmts: &[Stmt]) -> Result<Vec<TypedStmt>, TypeError> {
        self.loop_depth += 1;
        let result = self.check_scoped_block(stmts);
        self.loop_depth -= 1;
        result
    }

    pub(super) fn check_statement(&mut self, stmt: &Stmt) -> Result<TypedStmt, TypeError> {
        match stmt {
            Stmt::VarDecl {
                is_const,
                declarators,
                location,
            } => {
                let declarators = declarators
                    .iter()
                    .map(|decl| self.check_declarator(decl, *is_const))
                    .collect::<Result<_, _>>()?;
                Ok(TypedStmt::Let {
                    declarators,
                    location: *location,
                })
            }

            Stmt::For {
                init,
                condition,
                increment,
                body,
                location,
            } => {
                self.scopes.push_scope();
                let result = self.check_for(init.as_deref(), condition.as_ref(), increment.as_ref(), body);
                self.scopes.pop_scope();
                let (init, condition, increment, body) = result?;
                Ok(TypedStmt::For {
                    init,
                    condition,
                    increment,
                    body,
                    location: *location,
                })
            }

            Stmt::While {
                condition,
                body,
                location,
            } => {
                let condition = self.check_condition(condition, "while")?;
                let body = self.check_loop_body(body)?;
                Ok(TypedStmt::While {
                    condition,
                    body,
                    location: *location,
                })
            }

            Stmt::Break { location } => {
                self.check_inside_loop("break", *location)?;
                Ok(TypedStmt::Break {
                    location: *location,
                })
            }

            Stmt::Continue { location } => {
                self.check_inside_loop("continue", *location)?;
                Ok(TypedStmt::Continue {
                    location: *location,
                })
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                location,
            } => {
                let condition = self.check_condition(condition, "if")?;
                let then_branch = self.check_scoped_block(then_branch)?;
                let else_branch = else_branch
                    .as_ref()
                    .map(|stmts| self.check_scoped_block(stmts))
                    .transpose()?;
                Ok(TypedStmt::If {
                    condition,
                    then_branch,
                    else_branch,
                    location: *location,
                })
            }

            Stmt::Return { expr, location } => {
                let value = self.check_return(expr.as_ref(), *location)?;
                Ok(TypedStmt::Return {
                    value,
                    location: *location,
                })
            }

            Stmt::Block {
                statements,
                location,
            } => Ok(TypedStmt::Block {
                statements: self.check_scoped_block(statements)?,
                location: *location,
            }),

            Stmt::Expression { expr, location } => Ok(TypedStmt::Expression {
                expr: self.check_expr(expr)?,
                location: *location,
            }),
        }
    }

    fn check_declarator(&mut self, decl: &Declarator, is_const: bool) -> Result<TypedDeclarator, TypeError> {
        let annotated = decl.var_type.as_ref().map(|t| self.resolve_type(t)).transpose()?;
        let init = decl.init.as_ref().map(|e| self.check_expr(e)).transpose()?;

        let ty = match (annotated, &init) {
            (Some(declared), Some(value)) => {
                if declared != value.ty {
                    return Err(TypeError::new(
                        format!(
                            "Cannot initialize '{}' of type {} with a value of type {}",
                            decl.name, declared, value.ty
                        ),
                        value.location,
                    ));
                }
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(value)) => value.ty.clone(),
            (None, None) => {
                return Err(TypeError::new(
                    format!(
                        "Variable '{}' needs a type annotation or an initializer",
                        decl.name
                    ),
                    decl.location,
                ));
            }
        };

        if !ty.is_storable() {
            return Err(TypeError::new(
                format!("Cannot declare variable '{}' of type {}", decl.name, ty),
                decl.location,
            ));
        }

        self.declare_variable(&decl.name, ty.clone(), is_const, decl.location)?;
        Ok(TypedDeclarator {
            name: decl.name.clone(),
            ty,
            init,
            location: decl.location,
        })
    }

    /// Check the clauses of a `for` loop inside its loop scope
    #[allow(clippy::type_complexity)]
    fn check_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        increment: Option<&Expr>,
        body: &[Stmt],
    ) -> Result<
        (
            Option<Box<TypedStmt>>,
            Option<TypedExpr>,
            Option<TypedExpr>,
            Vec<TypedStmt>,
        ),
        TypeError,
    > {
        let init = init
            .map(|stmt| self.check_statement(stmt).map(Box::new))
            .transpose()?;
        let condition = condition
            .map(|cond| self.check_condition(cond, "for"))
            .transpose()?;
        let increment = increment.map(|expr| self.check_expr(expr)).transpose()?;
        let body = self.check_loop_body(body)?;
        Ok((init, condition, increment, body))
    }

    fn check_condition(&mut self, expr: &Expr, construct: &str) -> Result<TypedExpr, TypeError> {
        let condition = self.check_expr(expr)?;
        if condition.ty != Type::Bool {
            return Err(TypeError::new(
                format!(
                    "Condition of '{}' must be bool (a comparison), found {}",
                    construct, condition.ty
                ),
                condition.location,
            ));
        }
        Ok(condition)
    }

    fn check_inside_loop(&self, keyword: &str, location: SourceLocation) -> Result<(), TypeError> {
        if self.loop_depth == 0 {
            return Err(TypeError::new(
                format!("'{}' outside of a loop", keyword),
                location,
            ));
        }
        Ok(())
    }

    fn check_return(
        &mut self,
        expr: Option<&Expr>,
        location: SourceLocation,
    ) -> Result<Option<TypedExpr>, TypeError> {
        let (name, expected) = match &self.current_function {
            Some(ctx) => (ctx.name.clone(), ctx.return_type.clone()),
            None => {
                return Err(TypeError::new("'return' outside of a function", location));
            }
        };

        let value = expr.map(|e| self.check_expr(e)).transpose()?;
        match (expected, &value) {
            (Some(expected), Some(value)) if expected != value.ty => Err(TypeError::new(
                format!(
                    "Function '{}' must return {}, found {}",
                    name, expected, value.ty
                ),
                value.location,
            )),
            (Some(expected), None) => Err(TypeError::new(
                format!("Function '{}' must return a value of type {}", name, expected),
                location,
            )),
            (None, Some(_)) => Err(TypeError::new(
                format!("Function '{}' has no return type but returns a value", name),
                location,
            )),
            _ => Ok(value),
        }
    }
}
