use std::io::{self, Write};

use crate::{
    error::Throwable,
    internal, method, module, native,
    value::{ObjectRef, Value},
};

use super::{
    helpers::{clinit_generic, return_false},
    Args, MethodDescriptor, NameAndType, NativeModule,
};

/// File descriptor of the standard error stream, as stored in a stream's `fd` field.
const STDERR_FD: i64 = 2;

fn write_line(stream: &ObjectRef, text: &str, newline: bool) -> Result<Option<Value>, Throwable> {
    let to_stderr = stream
        .field("fd")
        .and_then(|fd| fd.as_integral().map(|i| i.value))
        == Some(STDERR_FD);

    let mut out: Box<dyn Write> = if to_stderr {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };

    let written = if newline {
        writeln!(out, "{text}")
    } else {
        write!(out, "{text}")
    };

    written.and_then(|_| out.flush()).map_err(|e| internal!(e))?;
    Ok(None)
}

module!(IOPrintStream, "java/io/PrintStream");
impl NativeModule for IOPrintStream {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        // Instance methods: argument 0 is the stream itself.
        fn println_value(args: Args) -> Result<Option<Value>, Throwable> {
            let this = args.object(0)?;
            let text = args
                .get(1)
                .map(ToString::to_string)
                .ok_or_else(|| internal!("println without a value"))?;

            write_line(this, &text, true)
        }

        fn println_empty(args: Args) -> Result<Option<Value>, Throwable> {
            write_line(args.object(0)?, "", true)
        }

        fn print_value(args: Args) -> Result<Option<Value>, Throwable> {
            let this = args.object(0)?;
            let text = args
                .get(1)
                .map(ToString::to_string)
                .ok_or_else(|| internal!("print without a value"))?;

            write_line(this, &text, false)
        }

        vec![
            method!(name: "println", descriptor: "()V" => native!(0 => println_empty)),
            method!(
                name: "println",
                descriptor: "(Ljava/lang/String;)V"
                => native!(1 => println_value)
            ),
            method!(name: "println", descriptor: "(I)V" => native!(1 => println_value)),
            method!(name: "println", descriptor: "(J)V" => native!(2 => println_value)),
            method!(name: "println", descriptor: "(D)V" => native!(2 => println_value)),
            method!(
                name: "print",
                descriptor: "(Ljava/lang/String;)V"
                => native!(1 => print_value)
            ),
        ]
    }
}

module!(IOFileDescriptor, "java/io/FileDescriptor");
impl NativeModule for IOFileDescriptor {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        fn get_handle(_: Args) -> Result<Option<Value>, Throwable> {
            // Noop on Unix, would return handle on Windows.
            Ok(Some(Value::long(-1)))
        }

        vec![
            method!(name: "initIDs", descriptor: "()V" => native!(0 => clinit_generic)),
            method!(name: "getHandle", descriptor: "(I)J" => native!(1 => get_handle)),
            method!(name: "getAppend", descriptor: "(I)Z" => native!(1 => return_false)),
        ]
    }
}
