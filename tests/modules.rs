mod common;

use bridge::{
    error::ExceptionKind,
    native::Outcome,
    options::BridgeOptions,
    registry::Registry,
    value::{Object, Value},
};
use common::{dassert_eq, iassert_eq, main_frames, sassert_eq};

fn registry() -> Registry {
    Registry::bootstrap(&BridgeOptions::default()).expect("bootstrap to succeed")
}

fn returned(outcome: Outcome) -> Value {
    outcome
        .into_value()
        .expect("normal return")
        .expect("a value")
}

fn raised(outcome: Outcome) -> (ExceptionKind, String) {
    let exception = outcome.into_exception().expect("an exception");
    (exception.kind, exception.message)
}

#[test]
fn math() {
    let registry = registry();

    iassert_eq(
        i32::MAX as i64,
        &returned(registry.invoke("java/lang/Math.abs(I)I", &[Value::int(-i32::MAX)])),
    );
    iassert_eq(
        i32::MIN as i64,
        &returned(registry.invoke("java/lang/Math.abs(I)I", &[Value::int(i32::MIN)])),
    );
    iassert_eq(
        1 << 40,
        &returned(registry.invoke("java/lang/Math.abs(J)J", &[Value::long(-(1 << 40))])),
    );
    iassert_eq(
        9,
        &returned(registry.invoke(
            "java/lang/Math.max(JJ)J",
            &[Value::long(-3), Value::long(9)],
        )),
    );
    iassert_eq(
        -3,
        &returned(registry.invoke(
            "java/lang/Math.min(II)I",
            &[Value::int(-3), Value::int(9)],
        )),
    );
    dassert_eq(
        3.0,
        &returned(registry.invoke("java/lang/Math.sqrt(D)D", &[Value::double(9.0)])),
    );
    dassert_eq(
        1024.0,
        &returned(registry.invoke(
            "java/lang/Math.pow(DD)D",
            &[Value::double(2.0), Value::double(10.0)],
        )),
    );
}

#[test]
fn floor_div() {
    let registry = registry();
    let div = |x: i32, y: i32| {
        registry.invoke("java/lang/Math.floorDiv(II)I", &[Value::int(x), Value::int(y)])
    };

    iassert_eq(3, &returned(div(7, 2)));
    iassert_eq(-4, &returned(div(-7, 2)));
    iassert_eq(-4, &returned(div(7, -2)));
    iassert_eq(3, &returned(div(-7, -2)));
    iassert_eq(i32::MIN as i64, &returned(div(i32::MIN, -1)));

    let (kind, message) = raised(div(1, 0));
    assert_eq!(ExceptionKind::Arithmetic, kind);
    assert_eq!("/ by zero", message);
}

#[test]
fn integer_parsing() {
    let registry = registry();
    let parse = |text: &str| {
        registry.invoke(
            "java/lang/Integer.parseInt(Ljava/lang/String;)I",
            &[Value::string(text)],
        )
    };

    iassert_eq(42, &returned(parse("42")));
    iassert_eq(-17, &returned(parse("-17")));
    iassert_eq(5, &returned(parse("+5")));

    let (kind, message) = raised(parse("x"));
    assert_eq!(ExceptionKind::NumberFormat, kind);
    assert_eq!("For input string: \"x\"", message);

    let (kind, _) = raised(parse("2147483648"));
    assert_eq!(ExceptionKind::NumberFormat, kind);

    let (kind, message) = raised(registry.invoke(
        "java/lang/Integer.parseInt(Ljava/lang/String;)I",
        &[Value::Null],
    ));
    assert_eq!(ExceptionKind::NumberFormat, kind);
    assert_eq!("Cannot parse null string: null", message);

    iassert_eq(
        255,
        &returned(registry.invoke(
            "java/lang/Integer.parseInt(Ljava/lang/String;I)I",
            &[Value::string("ff"), Value::int(16)],
        )),
    );

    let (_, message) = raised(registry.invoke(
        "java/lang/Integer.parseInt(Ljava/lang/String;I)I",
        &[Value::string("z"), Value::int(8)],
    ));
    assert_eq!("For input string: \"z\" under radix 8", message);

    sassert_eq(
        "-12",
        &returned(registry.invoke(
            "java/lang/Integer.toString(I)Ljava/lang/String;",
            &[Value::int(-12)],
        )),
    );
}

#[test]
fn object_identity() {
    let registry = registry();
    let thing = Value::Object(Object::new("Thing"));
    let other = Value::Object(Object::new("Thing"));

    let hash = |value: &Value| {
        returned(registry.invoke("java/lang/Object.hashCode()I", std::slice::from_ref(value)))
    };

    assert_eq!(hash(&thing), hash(&thing));
    assert_ne!(hash(&thing), hash(&other));
    assert_eq!(
        hash(&thing),
        returned(registry.invoke(
            "java/lang/System.identityHashCode(Ljava/lang/Object;)I",
            &[thing.clone()],
        ))
    );

    let (kind, _) = raised(registry.invoke("java/lang/Object.hashCode()I", &[Value::Null]));
    assert_eq!(ExceptionKind::NullPointer, kind);
}

#[test]
fn current_thread() {
    let registry = registry();
    let frames = main_frames();

    let thread = returned(registry.invoke(
        "java/lang/Thread.currentThread()Ljava/lang/Thread;",
        &[Value::Context(frames)],
    ));

    let thread = thread.as_object().expect("a thread object");
    assert_eq!("java/lang/Thread", thread.class_name());
    iassert_eq(1, &thread.field("tid").unwrap());
    sassert_eq("main", &thread.field("name").unwrap());
}

#[test]
fn system_clock() {
    let registry = registry();

    let millis = returned(registry.invoke("java/lang/System.currentTimeMillis()J", &[]));
    assert!(millis.as_integral().unwrap().value > 0);

    let nanos = returned(registry.invoke("java/lang/System.nanoTime()J", &[]));
    assert!(nanos.as_integral().unwrap().value > 0);
}

#[test]
fn io_and_security() {
    let registry = registry();

    iassert_eq(
        -1,
        &returned(registry.invoke("java/io/FileDescriptor.getHandle(I)J", &[Value::int(1)])),
    );
    iassert_eq(
        0,
        &returned(registry.invoke("java/io/FileDescriptor.getAppend(I)Z", &[Value::int(1)])),
    );

    let context = returned(registry.invoke(
        "java/security/AccessController.getStackAccessControlContext()Ljava/security/AccessControlContext;",
        &[],
    ));
    assert!(context.is_null());

    let stream = Value::Object(Object::new("java/io/PrintStream"));
    let printed = registry.invoke(
        "java/io/PrintStream.println(Ljava/lang/String;)V",
        &[stream, Value::string("hello from the bridge")],
    );
    assert!(matches!(printed, Outcome::Value(None)));

    let (kind, _) = raised(registry.invoke(
        "java/io/PrintStream.println(I)V",
        &[Value::Null, Value::int(1)],
    ));
    assert_eq!(ExceptionKind::NullPointer, kind);
}

#[test]
fn no_op_initialisers() {
    let registry = registry();

    for key in [
        "java/lang/Object.<clinit>()V",
        "java/lang/System.registerNatives()V",
        "java/io/FileDescriptor.initIDs()V",
    ] {
        assert!(
            matches!(registry.invoke(key, &[]), Outcome::Value(None)),
            "{key} to return void"
        );
    }
}
