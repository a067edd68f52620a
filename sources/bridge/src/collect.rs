use crate::{error::Throwable, internal, value::Value};

/// Take the arguments of a call off `operands` so the result is in stack
/// order: last parameter first, receiver (if any) last.
///
/// The operand stack holds one entry per value; longs and doubles count as two
/// of the `param_slots`. On error `operands` is left as it was.
pub fn collect_args(
    operands: &mut Vec<Value>,
    param_slots: usize,
    has_receiver: bool,
) -> Result<Vec<Value>, Throwable> {
    let mut remaining = param_slots;
    let mut taken = 0;

    for value in operands.iter().rev() {
        if remaining == 0 {
            break;
        }

        let width = value.slots();
        if width > remaining {
            return Err(internal!(
                "argument {:?} is {} slots wide but only {} remain",
                value,
                width,
                remaining
            ));
        }

        remaining -= width;
        taken += 1;
    }

    if remaining > 0 {
        return Err(internal!("not enough args, {} slots still needed", remaining));
    }

    if has_receiver {
        if taken == operands.len() {
            return Err(internal!("no receiver on the operand stack"));
        }
        taken += 1;
    }

    let mut args = operands.split_off(operands.len() - taken);
    args.reverse();
    Ok(args)
}
