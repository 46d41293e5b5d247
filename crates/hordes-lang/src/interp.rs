//! Tree-walking evaluator.
//!
//! Every program runs against its own [`Env`]; nothing survives between two
//! [`execute`] calls. Evaluation stops at the first error.

use std::rc::Rc;

use strum::{Display, EnumString};

use crate::ast::{
    ArithOp, Assign, Cond, Decl, Expr, ForLoop, ForSource, IfElse, Line, MethodCall, Path, Print,
    Program, RelOp,
};
use crate::error::{AttrFault, HdlError, NameFault, Pos, ValueFault};
use crate::hdl_parser::parse;
use crate::schema::{ArrayRef, RecordKind, RecordRef, TypeTag};
use crate::scope::{Binding, Env};
use crate::value::{Symbol, Value};

/// The closed set of operations on array values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ArrayMethod {
    /// Append every argument.
    Add,
    /// Remove the first element that is the same record as the argument.
    Remove,
}

/// Final state of a program run.
#[derive(Debug)]
pub struct Execution {
    /// Global symbols in declaration order.
    pub globals: Vec<Symbol>,
    /// Lines produced by `print`.
    pub output: Vec<String>,
}

impl Execution {
    /// Every global `Map` symbol, in declaration order.
    pub fn maps(&self) -> impl Iterator<Item = (&str, &RecordRef)> + '_ {
        self.globals.iter().filter_map(|symbol| match &symbol.value {
            Value::Record(record) if symbol.ty == TypeTag::Record(RecordKind::Map) => {
                Some((symbol.name.as_str(), record))
            }
            _ => None,
        })
    }
}

/// Parse and run `source` in a fresh environment.
pub fn execute(source: &str) -> Result<Execution, HdlError> {
    let program = parse(source)?;
    let mut interp = Interpreter::new();
    interp.run(&program)?;
    Ok(interp.finish())
}

/// Where a resolved path can be written back.
#[derive(Debug)]
enum Place {
    Var { frame: usize, name: String },
    Field { record: RecordRef, name: String },
    Element { array: ArrayRef, index: usize },
}

#[derive(Debug)]
struct Resolved {
    ty: TypeTag,
    value: Value,
    place: Place,
}

fn type_error(msg: impl Into<String>, pos: Pos) -> HdlError {
    HdlError::Type {
        msg: msg.into(),
        pos,
    }
}

#[derive(Debug, Default)]
pub struct Interpreter {
    env: Env,
    output: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, program: &Program) -> Result<(), HdlError> {
        self.block(&program.lines)
    }

    pub fn finish(self) -> Execution {
        Execution {
            globals: self.env.into_globals(),
            output: self.output,
        }
    }

    fn block(&mut self, lines: &[Line]) -> Result<(), HdlError> {
        lines.iter().try_for_each(|line| self.line(line))
    }

    /// Run `f` inside a fresh scope, popping it whatever the outcome.
    fn scoped(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), HdlError>,
    ) -> Result<(), HdlError> {
        self.env.push();
        let result = f(self);
        self.env.pop();
        result
    }

    fn line(&mut self, line: &Line) -> Result<(), HdlError> {
        match line {
            Line::Decl(decl) => self.declare(decl),
            Line::Assign(assign) => self.assign(assign),
            Line::MethodCall(call) => self.call(call),
            Line::Print(print) => self.print(print),
            Line::For(for_loop) => self.for_loop(for_loop),
            Line::If(if_else) => self.if_else(if_else),
        }
    }

    fn bind(&mut self, symbol: Symbol, pos: Pos) -> Result<(), HdlError> {
        if self.env.declared_here(&symbol.name) {
            return Err(HdlError::Name {
                name: symbol.name,
                fault: NameFault::AlreadyDeclared,
                pos,
            });
        }
        self.env.add(symbol).map_err(|symbol| HdlError::Name {
            name: symbol.name,
            fault: NameFault::AlreadyDeclared,
            pos,
        })
    }

    fn declare(&mut self, decl: &Decl) -> Result<(), HdlError> {
        log::debug!("{}: declare {} {}", decl.pos, decl.kind, decl.name);
        let symbol = Symbol::declare(decl.name.clone(), decl.kind, decl.dimension);
        self.bind(symbol, decl.pos)
    }

    fn assign(&mut self, assign: &Assign) -> Result<(), HdlError> {
        let target = self.resolve(&assign.target)?;
        let value = self.eval(&assign.value)?;
        if target.ty != value.ty {
            return Err(type_error(
                format!(
                    "cannot assign {} to '{}' of type {}",
                    value.ty, assign.target, target.ty
                ),
                assign.value.pos(),
            ));
        }
        self.write(target.place, value.value, assign.value.pos())
    }

    fn write(&mut self, place: Place, value: Value, pos: Pos) -> Result<(), HdlError> {
        match place {
            Place::Var { frame, name } => match self.env.symbol_mut(frame, &name) {
                Some(symbol) => {
                    symbol.value = value;
                    Ok(())
                }
                None => Err(HdlError::Name {
                    name,
                    fault: NameFault::Undeclared,
                    pos,
                }),
            },
            Place::Field { record, name } => {
                self.env.push_record(record);
                let stored = self.env.set(&name, value);
                self.env.pop();
                if stored {
                    Ok(())
                } else {
                    Err(HdlError::Attr {
                        name,
                        fault: AttrFault::Field,
                        pos,
                    })
                }
            }
            Place::Element { array, index } => match value {
                Value::Record(record) => {
                    array.borrow_mut().items[index] = record;
                    Ok(())
                }
                other => Err(type_error(
                    format!("cannot store {other} in an array"),
                    pos,
                )),
            },
        }
    }

    /// Walk a dotted path. Each attribute step looks the field up in a
    /// record frame pushed for that step alone.
    fn resolve(&mut self, path: &Path) -> Result<Resolved, HdlError> {
        let root = &path.root;
        let (frame, symbol) = self.env.search(&root.name).ok_or_else(|| HdlError::Name {
            name: root.name.clone(),
            fault: NameFault::Undeclared,
            pos: root.pos,
        })?;
        let mut current = Resolved {
            ty: symbol.ty,
            value: symbol.value.clone(),
            place: Place::Var {
                frame,
                name: root.name.clone(),
            },
        };
        if let Some(index) = root.index {
            current = Self::element(current, &root.name, index, root.pos)?;
        }

        for seg in &path.attrs {
            let record = match &current.value {
                Value::Record(record) => Rc::clone(record),
                Value::Unset => {
                    return Err(HdlError::Attr {
                        name: seg.name.clone(),
                        fault: AttrFault::Unset,
                        pos: seg.pos,
                    });
                }
                _ => {
                    return Err(HdlError::Attr {
                        name: seg.name.clone(),
                        fault: AttrFault::Field,
                        pos: seg.pos,
                    });
                }
            };

            self.env.push_record(Rc::clone(&record));
            let binding = self.env.get(&seg.name);
            self.env.pop();

            let Binding { ty, value } = binding.ok_or_else(|| HdlError::Attr {
                name: seg.name.clone(),
                fault: AttrFault::Field,
                pos: seg.pos,
            })?;
            current = Resolved {
                ty,
                value,
                place: Place::Field {
                    record,
                    name: seg.name.clone(),
                },
            };
            if let Some(index) = seg.index {
                current = Self::element(current, &seg.name, index, seg.pos)?;
            }
        }
        Ok(current)
    }

    fn element(resolved: Resolved, name: &str, index: i64, pos: Pos) -> Result<Resolved, HdlError> {
        let Value::Array(array) = resolved.value else {
            return Err(type_error(
                format!("'{name}' of type {} cannot be indexed", resolved.ty),
                pos,
            ));
        };
        let inner = array.borrow();
        let slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < inner.len())
            .ok_or(HdlError::Index {
                index,
                len: inner.len(),
                pos,
            })?;
        let ty = TypeTag::Record(inner.elem);
        let value = Value::Record(Rc::clone(&inner.items[slot]));
        drop(inner);
        Ok(Resolved {
            ty,
            value,
            place: Place::Element { array, index: slot },
        })
    }

    fn call(&mut self, call: &MethodCall) -> Result<(), HdlError> {
        let target = self.resolve(&call.target)?;
        let Value::Array(array) = target.value else {
            return Err(type_error(
                format!("'{}' of type {} has no methods", call.target, target.ty),
                call.target.pos(),
            ));
        };
        let method: ArrayMethod = call.method.parse().map_err(|_| HdlError::Attr {
            name: call.method.clone(),
            fault: AttrFault::Method,
            pos: call.method_pos,
        })?;

        let elem = TypeTag::Record(array.borrow().elem);
        let mut records = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let operand = self.eval(arg)?;
            match operand.value {
                Value::Record(record) if operand.ty == elem => records.push((record, arg.pos())),
                Value::Unset => {
                    return Err(type_error(
                        format!("cannot {method} an unset {}", operand.ty),
                        arg.pos(),
                    ));
                }
                _ => {
                    return Err(type_error(
                        format!("{method} expects {elem}, got {}", operand.ty),
                        arg.pos(),
                    ));
                }
            }
        }

        let mut array = array.borrow_mut();
        match method {
            ArrayMethod::Add => array.items.extend(records.into_iter().map(|(r, _)| r)),
            ArrayMethod::Remove => {
                for (record, pos) in records {
                    let found = array.items.iter().position(|item| Rc::ptr_eq(item, &record));
                    match found {
                        Some(i) => {
                            array.items.remove(i);
                        }
                        None => {
                            return Err(HdlError::Value {
                                fault: ValueFault::NotInList,
                                pos,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn print(&mut self, print: &Print) -> Result<(), HdlError> {
        let mut parts = Vec::with_capacity(print.args.len());
        for arg in &print.args {
            parts.push(self.eval(arg)?.value.to_string());
        }
        self.output.push(parts.join(" "));
        Ok(())
    }

    fn for_loop(&mut self, for_loop: &ForLoop) -> Result<(), HdlError> {
        let pos = for_loop.pos;
        match &for_loop.source {
            ForSource::Range { start, end } => {
                for i in *start..*end {
                    self.scoped(|this| {
                        this.bind(
                            Symbol::new(for_loop.binding.clone(), TypeTag::Int, Value::Int(i)),
                            pos,
                        )?;
                        this.block(&for_loop.body)
                    })?;
                }
            }
            ForSource::Elements(path) => {
                let source = self.resolve(path)?;
                let Value::Array(array) = source.value else {
                    return Err(type_error(
                        format!("cannot iterate over '{path}' of type {}", source.ty),
                        path.pos(),
                    ));
                };
                // Elements added or removed by the body do not change the
                // iteration.
                let (elem, items) = {
                    let array = array.borrow();
                    (array.elem, array.items.clone())
                };
                for item in items {
                    self.scoped(|this| {
                        this.bind(
                            Symbol::new(
                                for_loop.binding.clone(),
                                TypeTag::Record(elem),
                                Value::Record(item),
                            ),
                            pos,
                        )?;
                        this.block(&for_loop.body)
                    })?;
                }
            }
        }
        Ok(())
    }

    fn if_else(&mut self, if_else: &IfElse) -> Result<(), HdlError> {
        if self.cond(&if_else.cond)? {
            self.scoped(|this| this.block(&if_else.then_block))
        } else if let Some(else_block) = &if_else.else_block {
            self.scoped(|this| this.block(else_block))
        } else {
            Ok(())
        }
    }

    /// Both operands of `and`/`or` are always evaluated.
    fn cond(&mut self, cond: &Cond) -> Result<bool, HdlError> {
        match cond {
            Cond::Compare { lhs, op, rhs, pos } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                compare(&lhs, *op, &rhs, *pos)
            }
            Cond::Not(inner) => Ok(!self.cond(inner)?),
            Cond::And(lhs, rhs) => {
                let lhs = self.cond(lhs)?;
                let rhs = self.cond(rhs)?;
                Ok(lhs & rhs)
            }
            Cond::Or(lhs, rhs) => {
                let lhs = self.cond(lhs)?;
                let rhs = self.cond(rhs)?;
                Ok(lhs | rhs)
            }
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Binding, HdlError> {
        match expr {
            Expr::Int(v, _) => Ok(Binding {
                ty: TypeTag::Int,
                value: Value::Int(*v),
            }),
            Expr::Real(v, _) => Ok(Binding {
                ty: TypeTag::Real,
                value: Value::Real(*v),
            }),
            Expr::Str(s, _) => Ok(Binding {
                ty: TypeTag::Str,
                value: Value::Str(s.clone()),
            }),
            Expr::Path(path) => {
                let Resolved { ty, value, .. } = self.resolve(path)?;
                Ok(Binding { ty, value })
            }
            Expr::Binary { op, lhs, rhs, pos } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                arith(*op, &lhs, &rhs, *pos)
            }
        }
    }
}

fn arith(op: ArithOp, lhs: &Binding, rhs: &Binding, pos: Pos) -> Result<Binding, HdlError> {
    if !lhs.ty.is_numeric() || lhs.ty != rhs.ty {
        return Err(type_error(
            format!(
                "unsupported operand types for {}: {} and {}",
                op.symbol(),
                lhs.ty,
                rhs.ty
            ),
            pos,
        ));
    }
    let value = match (&lhs.value, &rhs.value) {
        (Value::Int(a), Value::Int(b)) => int_arith(op, *a, *b, pos)?,
        (Value::Real(a), Value::Real(b)) => {
            if op == ArithOp::Div && *b == 0.0 {
                return Err(HdlError::Value {
                    fault: ValueFault::DivisionByZero,
                    pos,
                });
            }
            Value::Real(match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
            })
        }
        _ => {
            return Err(type_error(
                format!("non-numeric operand for {}", op.symbol()),
                pos,
            ));
        }
    };
    let ty = match value {
        Value::Int(_) => TypeTag::Int,
        _ => TypeTag::Real,
    };
    Ok(Binding { ty, value })
}

/// Integer arithmetic wraps; a division that is not exact yields a real.
fn int_arith(op: ArithOp, a: i64, b: i64, pos: Pos) -> Result<Value, HdlError> {
    let value = match op {
        ArithOp::Add => Value::Int(a.wrapping_add(b)),
        ArithOp::Sub => Value::Int(a.wrapping_sub(b)),
        ArithOp::Mul => Value::Int(a.wrapping_mul(b)),
        ArithOp::Div => {
            if b == 0 {
                return Err(HdlError::Value {
                    fault: ValueFault::DivisionByZero,
                    pos,
                });
            }
            if a.wrapping_rem(b) == 0 {
                Value::Int(a.wrapping_div(b))
            } else {
                Value::Real(a as f64 / b as f64)
            }
        }
    };
    Ok(value)
}

fn compare(lhs: &Binding, op: RelOp, rhs: &Binding, pos: Pos) -> Result<bool, HdlError> {
    let mismatch = || {
        type_error(
            format!(
                "cannot compare {} {} {}",
                lhs.ty,
                op.symbol(),
                rhs.ty
            ),
            pos,
        )
    };
    if lhs.ty != rhs.ty {
        return Err(mismatch());
    }
    let ordering = match (&lhs.value, &rhs.value) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
        _ => {
            // References only support identity tests.
            return match op {
                RelOp::Eq => Ok(lhs.value.same(&rhs.value)),
                RelOp::Ne => Ok(!lhs.value.same(&rhs.value)),
                _ => Err(mismatch()),
            };
        }
    };
    let Some(ordering) = ordering else {
        // NaN compares unequal to everything.
        return Ok(op == RelOp::Ne);
    };
    Ok(match op {
        RelOp::Eq => ordering.is_eq(),
        RelOp::Ne => ordering.is_ne(),
        RelOp::Gt => ordering.is_gt(),
        RelOp::Ge => ordering.is_ge(),
        RelOp::Lt => ordering.is_lt(),
        RelOp::Le => ordering.is_le(),
    })
}
