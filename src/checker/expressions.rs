//! Expression checking
//!
//! Every expression is checked bottom-up and annotated with its type.
//! Operators never convert implicitly: an `int` and a `char` only meet
//! through an explicit `as` cast.

use super::scope::Symbol;
use super::typed::{TypedExpr, TypedExprKind};
use super::types::Type;
use super::{Checker, TypeError};
use crate::parser::ast::{BinOp, Expr, SourceLocation, UnOp};

impl Checker<'_> {
    pub(super) fn check_expr(&mut self, expr: &Expr) -> Result<TypedExpr, TypeError> {
        let location = expr.location();

        let (kind, ty) = match expr {
            Expr::IntLiteral(n, _) => (TypedExprKind::IntLiteral(*n), Type::Int),

            Expr::CharLiteral(c, _) => (TypedExprKind::CharLiteral(*c), Type::Char),

            Expr::Variable(name, _) => {
                let symbol = self.lookup_variable(name, location)?;
                (TypedExprKind::Variable(name.clone()), symbol.ty.clone())
            }

            Expr::BinaryOp {
                op, left, right, ..
            } => {
                let left = self.check_expr(left)?;
                let right = self.check_expr(right)?;
                let ty = Self::binary_result_type(*op, &left.ty, &right.ty, location)?;
                (
                    TypedExprKind::Binary {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    ty,
                )
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.check_expr(left)?;
                let right = self.check_expr(right)?;
                if left.ty != Type::Bool || right.ty != Type::Bool {
                    return Err(TypeError::new(
                        format!(
                            "Operator '{}' requires bool operands, found {} and {}",
                            op.symbol(),
                            left.ty,
                            right.ty
                        ),
                        location,
                    ));
                }
                (
                    TypedExprKind::Logical {
                        op: *op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    Type::Bool,
                )
            }

            Expr::UnaryOp { op, operand, .. } => {
                let operand = self.check_expr(operand)?;
                let ty = match (op, &operand.ty) {
                    (UnOp::Neg, Type::Int) => Type::Int,
                    (UnOp::Not, Type::Bool) => Type::Bool,
                    (UnOp::Neg, other) => {
                        return Err(TypeError::new(
                            format!("Unary '-' requires int, found {}", other),
                            location,
                        ));
                    }
                    (UnOp::Not, other) => {
                        return Err(TypeError::new(
                            format!("Operator '!' requires bool, found {}", other),
                            location,
                        ));
                    }
                };
                (
                    TypedExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                )
            }

            Expr::Assignment {
                target, op, value, ..
            } => {
                let var_ty = self.lookup_mutable(target, location)?;
                let value = self.check_expr(value)?;

                if let Some(op) = op {
                    Self::binary_result_type(*op, &var_ty, &value.ty, location)?;
                } else if value.ty != var_ty {
                    return Err(TypeError::new(
                        format!(
                            "Cannot assign a value of type {} to '{}' of type {}",
                            value.ty, target, var_ty
                        ),
                        value.location,
                    ));
                }

                (
                    TypedExprKind::Assign {
                        target: target.clone(),
                        op: *op,
                        value: Box::new(value),
                    },
                    var_ty,
                )
            }

            Expr::IncDec { op, target, .. } => {
                let var_ty = self.lookup_mutable(target, location)?;
                if !matches!(var_ty, Type::Int | Type::Char) {
                    return Err(TypeError::new(
                        format!(
                            "Operator '{}' requires int or char, found {}",
                            if op.is_increment() { "++" } else { "--" },
                            var_ty
                        ),
                        location,
                    ));
                }
                (
                    TypedExprKind::IncDec {
                        op: *op,
                        target: target.clone(),
                    },
                    var_ty,
                )
            }

            Expr::FunctionCall { name, args, .. } => {
                let (callee, signature) = match self.functions.get(name) {
                    Some((callee, signature)) => (*callee, signature.clone()),
                    None if self.scopes.lookup(name).is_some() => {
                        return Err(TypeError::new(
                            format!("'{}' is a variable, not a function", name),
                            location,
                        ));
                    }
                    None => {
                        return Err(TypeError::new(
                            format!("Call to undeclared function '{}'", name),
                            location,
                        ));
                    }
                };

                if args.len() != signature.params.len() {
                    return Err(TypeError::new(
                        format!(
                            "Function '{}' expects {} argument(s), found {}",
                            name,
                            signature.params.len(),
                            args.len()
                        ),
                        location,
                    ));
                }

                let mut typed_args = Vec::with_capacity(args.len());
                for (i, (arg, expected)) in args.iter().zip(&signature.params).enumerate() {
                    let arg = self.check_expr(arg)?;
                    if &arg.ty != expected {
                        return Err(TypeError::new(
                            format!(
                                "Argument {} of '{}' expects {}, found {}",
                                i + 1,
                                name,
                                expected,
                                arg.ty
                            ),
                            arg.location,
                        ));
                    }
                    typed_args.push(arg);
                }

                (
                    TypedExprKind::Call {
                        callee,
                        args: typed_args,
                    },
                    *signature.ret,
                )
            }

            Expr::Cast {
                target_type, expr, ..
            } => {
                let target = self.resolve_type(target_type)?;
                let inner = self.check_expr(expr)?;
                if !inner.ty.is_storable() {
                    return Err(TypeError::new(
                        format!("Cannot cast {} to {}", inner.ty, target),
                        location,
                    ));
                }
                (TypedExprKind::Cast(Box::new(inner)), target)
            }
        };

        Ok(TypedExpr { kind, ty, location })
    }

    /// Result type of `left op right`, or why the operands don't fit
    pub(super) fn binary_result_type(
        op: BinOp,
        left: &Type,
        right: &Type,
        location: SourceLocation,
    ) -> Result<Type, TypeError> {
        if left != right {
            return Err(TypeError::new(
                format!(
                    "Operator '{}' requires operands of the same type, found {} and {}",
                    op.symbol(),
                    left,
                    right
                ),
                location,
            ));
        }

        let allowed = if op.is_arithmetic() || op.is_ordering() {
            matches!(left, Type::Int | Type::Char)
        } else {
            matches!(left, Type::Int | Type::Char | Type::Bool)
        };
        if !allowed {
            return Err(TypeError::new(
                format!("Operator '{}' cannot be applied to {}", op.symbol(), left),
                location,
            ));
        }

        Ok(if op.is_arithmetic() {
            left.clone()
        } else {
            Type::Bool
        })
    }

    fn lookup_variable(&self, name: &str, location: SourceLocation) -> Result<&Symbol, TypeError> {
        if let Some(symbol) = self.scopes.lookup(name) {
            return Ok(symbol);
        }
        if self.functions.contains_key(name) {
            return Err(TypeError::new(
                format!("Function '{}' cannot be used as a value", name),
                location,
            ));
        }
        Err(TypeError::new(
            format!("Unresolved identifier '{}'", name),
            location,
        ))
    }

    /// Look up an assignment or `++`/`--` target and return its type
    fn lookup_mutable(&self, name: &str, location: SourceLocation) -> Result<Type, TypeError> {
        let symbol = self.lookup_variable(name, location)?;
        if symbol.is_const {
            return Err(TypeError::new(
                format!("Cannot assign to constant '{}'", name),
                location,
            ));
        }
        Ok(symbol.ty.clone())
    }
}
