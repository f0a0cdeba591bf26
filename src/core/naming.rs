/// Separator Docker places between a stack namespace and an object name.
pub const STACK_SEPARATOR: char = '_';

/// Returns `<stack>_`, the prefix `docker stack deploy` puts on object names.
pub fn stack_prefix(stack: &str) -> String {
    format!("{}{}", stack, STACK_SEPARATOR)
}

/// Whether `value` was created inside `stack`.
pub fn has_stack_prefix(value: &str, stack: &str) -> bool {
    value
        .strip_prefix(stack)
        .is_some_and(|rest| rest.starts_with(STACK_SEPARATOR))
}

/// Removes a leading `<stack>_` once. Values without it come back unchanged.
pub fn strip_stack_prefix<'a>(value: &'a str, stack: &str) -> &'a str {
    value
        .strip_prefix(stack)
        .and_then(|rest| rest.strip_prefix(STACK_SEPARATOR))
        .unwrap_or(value)
}
