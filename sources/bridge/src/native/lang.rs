use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::{ExceptionKind, Throwable},
    frame::thread_label,
    internal, method, module, native, throw,
    value::{Object, Value},
};

use super::{
    helpers::{clinit_generic, just_return},
    Args, MethodDescriptor, NameAndType, NativeModule,
};

module!(LangObject, "java/lang/Object");
impl NativeModule for LangObject {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn hash_code(args: Args) -> Result<Option<Value>, Throwable> {
            let this = args.object(0)?;
            Ok(Some(Value::int(Object::identity(this) as i32)))
        }

        vec![
            method!(name: "<clinit>", descriptor: "()V" => native!(0 => clinit_generic)),
            method!(name: "<init>", descriptor: "()V" => native!(0 => just_return)),
            method!(name: "registerNatives", descriptor: "()V" => native!(0 => just_return)),
            method!(name: "hashCode", descriptor: "()I" => native!(0 => hash_code)),
        ]
    }
}

module!(LangMath, "java/lang/Math");
impl NativeModule for LangMath {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn abs_int(args: Args) -> Result<Option<Value>, Throwable> {
            let value = args.integral(0)? as i32;
            Ok(Some(Value::int(value.wrapping_abs())))
        }

        fn abs_long(args: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::long(args.integral(0)?.wrapping_abs())))
        }

        fn max_long(args: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::long(args.integral(0)?.max(args.integral(1)?))))
        }

        fn min_int(args: Args) -> Result<Option<Value>, Throwable> {
            let (a, b) = (args.integral(0)? as i32, args.integral(1)? as i32);
            Ok(Some(Value::int(a.min(b))))
        }

        fn floor_div(args: Args) -> Result<Option<Value>, Throwable> {
            let (x, y) = (args.integral(0)? as i32, args.integral(1)? as i32);
            if y == 0 {
                return Err(throw!(ExceptionKind::Arithmetic, "/ by zero"));
            }

            let quotient = x.wrapping_div(y);
            let rounded = if x.wrapping_rem(y) != 0 && (x ^ y) < 0 {
                quotient - 1
            } else {
                quotient
            };

            Ok(Some(Value::int(rounded)))
        }

        fn sqrt(args: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::double(args.floating(0)?.sqrt())))
        }

        fn pow(args: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::double(args.floating(0)?.powf(args.floating(1)?))))
        }

        vec![
            method!(name: "abs", descriptor: "(I)I" => native!(1 => abs_int)),
            method!(name: "abs", descriptor: "(J)J" => native!(2 => abs_long)),
            method!(name: "max", descriptor: "(JJ)J" => native!(4 => max_long)),
            method!(name: "min", descriptor: "(II)I" => native!(2 => min_int)),
            method!(name: "floorDiv", descriptor: "(II)I" => native!(2 => floor_div)),
            method!(name: "sqrt", descriptor: "(D)D" => native!(2 => sqrt)),
            method!(name: "pow", descriptor: "(DD)D" => native!(4 => pow)),
        ]
    }
}

module!(LangSystem, "java/lang/System");
impl NativeModule for LangSystem {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn since_epoch() -> Result<std::time::Duration, Throwable> {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e| internal!("clock before epoch: {}", e))
        }

        fn nano_time(_: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::long(since_epoch()?.as_nanos() as i64)))
        }

        fn current_time_millis(_: Args) -> Result<Option<Value>, Throwable> {
            Ok(Some(Value::long(since_epoch()?.as_millis() as i64)))
        }

        fn identity_hash_code(args: Args) -> Result<Option<Value>, Throwable> {
            let hash = match args.get(0) {
                Some(Value::Object(obj)) => Object::identity(obj) as i32,
                Some(Value::Null) => 0,
                _ => return Err(internal!("identityHashCode expects an object")),
            };

            Ok(Some(Value::int(hash)))
        }

        vec![
            method!(name: "registerNatives", descriptor: "()V" => native!(0 => just_return)),
            method!(name: "nanoTime", descriptor: "()J" => native!(0 => nano_time)),
            method!(
                name: "currentTimeMillis",
                descriptor: "()J"
                => native!(0 => current_time_millis)
            ),
            method!(
                name: "identityHashCode",
                descriptor: "(Ljava/lang/Object;)I"
                => native!(1 => identity_hash_code)
            ),
        ]
    }
}

module!(LangThread, "java/lang/Thread");
impl NativeModule for LangThread {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn current_thread(args: Args) -> Result<Option<Value>, Throwable> {
            let thread = args.context()?.read().thread();

            let obj = Object::new("java/lang/Thread");
            obj.set_field("tid", Value::long(thread as i64));
            obj.set_field("name", Value::string(thread_label(thread)));

            Ok(Some(Value::Object(obj)))
        }

        vec![
            method!(name: "registerNatives", descriptor: "()V" => native!(0 => just_return)),
            method!(
                name: "currentThread",
                descriptor: "()Ljava/lang/Thread;"
                => native!(0, context => current_thread)
            ),
        ]
    }
}

module!(LangInteger, "java/lang/Integer");
impl NativeModule for LangInteger {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn parse(args: Args, radix: u32) -> Result<Option<Value>, Throwable> {
            if !(2..=36).contains(&radix) {
                return Err(throw!(
                    ExceptionKind::NumberFormat,
                    "radix {} out of range",
                    radix
                ));
            }

            if args.get(0).map_or(true, Value::is_null) {
                return Err(throw!(
                    ExceptionKind::NumberFormat,
                    "Cannot parse null string: null"
                ));
            }

            let input = args.string(0)?;
            let parsed = i32::from_str_radix(input, radix).map_err(|_| {
                if radix == 10 {
                    throw!(ExceptionKind::NumberFormat, "For input string: \"{}\"", input)
                } else {
                    throw!(
                        ExceptionKind::NumberFormat,
                        "For input string: \"{}\" under radix {}",
                        input,
                        radix
                    )
                }
            })?;

            Ok(Some(Value::int(parsed)))
        }

        fn parse_int(args: Args) -> Result<Option<Value>, Throwable> {
            parse(args, 10)
        }

        fn parse_int_radix(args: Args) -> Result<Option<Value>, Throwable> {
            let radix = args.integral(1)?;
            parse(args, u32::try_from(radix).unwrap_or(0))
        }

        fn to_string(args: Args) -> Result<Option<Value>, Throwable> {
            let value = args.integral(0)? as i32;
            Ok(Some(Value::string(value.to_string())))
        }

        vec![
            method!(
                name: "parseInt",
                descriptor: "(Ljava/lang/String;)I"
                => native!(1 => parse_int)
            ),
            method!(
                name: "parseInt",
                descriptor: "(Ljava/lang/String;I)I"
                => native!(2 => parse_int_radix)
            ),
            method!(
                name: "toString",
                descriptor: "(I)Ljava/lang/String;"
                => native!(1 => to_string)
            ),
        ]
    }
}
