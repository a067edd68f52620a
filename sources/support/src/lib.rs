pub mod descriptor;
pub mod signature;

#[cfg(test)]
mod tests {
    use crate::descriptor::{BaseType, FieldType, MethodType, ObjectType};
    use crate::signature::{is_valid_key, split_key, Signature};
    use anyhow::Result;

    #[test]
    fn it_parses_simple_descriptors() -> Result<()> {
        let descriptor = FieldType::parse("Z".to_string())?;
        let descriptor = descriptor.into_base().unwrap();

        assert!(descriptor.is_boolean());

        Ok(())
    }

    #[test]
    fn it_parses_array_descriptors() -> Result<()> {
        let descriptor = FieldType::parse("[D".to_string())?;
        let descriptor = descriptor.into_array().unwrap();

        let field = descriptor.field_type;
        let field = field.into_base().unwrap();

        assert!(field.is_double());

        Ok(())
    }

    #[test]
    fn it_parses_method_descriptors() -> Result<()> {
        let descriptor = MethodType::parse("(IDLjava/lang/Thread;)Ljava/lang/Object;".to_string())?;
        assert_eq!(
            descriptor.parameters,
            vec![
                FieldType::Base(BaseType::Int),
                FieldType::Base(BaseType::Double),
                FieldType::Object(ObjectType {
                    class_name: "java/lang/Thread".to_string()
                })
            ]
        );

        assert_eq!(
            descriptor.return_type,
            FieldType::Object(ObjectType {
                class_name: "java/lang/Object".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn it_rejects_truncated_descriptors() {
        assert!(MethodType::parse("(I".to_string()).is_err());
        assert!(MethodType::parse("(Ljava/lang/String)V".to_string()).is_err());
        assert!(MethodType::parse("(I)VV".to_string()).is_err());
        assert!(FieldType::parse("L;".to_string()).is_err());
    }

    #[test]
    fn it_rejects_void_parameters() {
        assert!(MethodType::parse("(V)V".to_string()).is_err());
        assert!(MethodType::parse("(IV)V".to_string()).is_err());
        assert!(MethodType::parse("()V".to_string()).is_ok());
    }

    #[test]
    fn it_unparses_method_descriptors() -> Result<()> {
        let descriptor =
            MethodType::parse("(Ljava/lang/Object;ILjava/lang/Object;II)V".to_string())?;
        let unparsed = descriptor.to_string();

        assert_eq!(unparsed, "(Ljava/lang/Object;ILjava/lang/Object;II)V");
        assert!(descriptor.returns_void());

        Ok(())
    }

    #[test]
    fn it_counts_wide_parameters_as_two_slots() -> Result<()> {
        let cases = [
            ("()V", 0),
            ("(I)V", 1),
            ("(J)J", 2),
            ("(JJ)J", 4),
            ("(DI)D", 3),
            ("(Ljava/lang/String;JZ)D", 4),
            ("([J[D)V", 2),
        ];

        for (descriptor, slots) in cases {
            let ty = MethodType::parse(descriptor.to_string())?;
            assert_eq!(ty.parameter_slots(), slots, "{descriptor}");
        }

        Ok(())
    }

    #[test]
    fn it_checks_key_shape() {
        assert!(!is_valid_key("java/lang/Object"));
        assert!(!is_valid_key("java/lang/Object.toString"));
        assert!(!is_valid_key("java/lang/Object.toString("));
        assert!(!is_valid_key("java/lang/Object.toString()"));
        assert!(!is_valid_key(".toString()V"));
        assert!(!is_valid_key("java/lang/Object.()V"));
        assert!(!is_valid_key("java/lang/Object.f)(V"));
        assert!(!is_valid_key("java/lang/Object.f((I)V"));
        assert!(!is_valid_key("invalidKey"));

        assert!(is_valid_key("java/lang/Object.toString(I)Ljava/lang/String;"));
        assert!(is_valid_key("java/lang/Object.<init>()V"));
        assert!(is_valid_key("test.f2(I)V"));
    }

    #[test]
    fn it_splits_keys() {
        assert_eq!(
            split_key("java/lang/Math.max(JJ)J"),
            Some(("java/lang/Math", "max", "(JJ)J"))
        );
    }

    #[test]
    fn it_parses_signatures() -> Result<()> {
        let signature = Signature::parse("java/lang/Integer.parseInt(Ljava/lang/String;I)I")?;

        assert_eq!(signature.class_name(), "java/lang/Integer");
        assert_eq!(signature.method_name(), "parseInt");
        assert_eq!(signature.descriptor().parameter_slots(), 2);
        assert_eq!(
            signature.to_string(),
            "java/lang/Integer.parseInt(Ljava/lang/String;I)I"
        );

        assert!(Signature::parse("java/lang/Integer.parseInt(Q)I").is_err());

        Ok(())
    }
}
