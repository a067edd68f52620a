use crate::{method, module, native};

use super::{
    helpers::{just_return, return_null},
    MethodDescriptor, NameAndType, NativeModule,
};

module!(SecurityAccessController, "java/security/AccessController");
impl NativeModule for SecurityAccessController {
    fn classname(&self) -> &'static str {
        Self::CLASS
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        vec![
            // Null defined in the docs as "privileged code".
            method!(
                name: "getStackAccessControlContext",
                descriptor: "()Ljava/security/AccessControlContext;"
                => native!(0 => return_null)
            ),
            method!(
                name: "ensureMaterializedForStackWalk",
                descriptor: "(Ljava/lang/Object;)V"
                => native!(1 => just_return)
            ),
        ]
    }
}
