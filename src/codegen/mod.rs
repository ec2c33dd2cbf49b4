pub(crate) mod masm;
