use super::OverrideRequest;
use k8s_openapi::api::core::v1::Container;

/// Copy `existing` and apply the non-empty overrides to the copy.
///
/// Command and args replace the whole list. stdin/tty are always written.
pub fn patch(existing: &Container, request: &OverrideRequest) -> Container {
    let mut container = existing.clone();

    if let Some(image) = request.image() {
        container.image = Some(image.to_string());
    }
    if !request.command.is_empty() {
        container.command = Some(request.command.clone());
    }
    if !request.args.is_empty() {
        container.args = Some(request.args.clone());
    }
    container.stdin = Some(request.stdin);
    container.tty = Some(request.tty);

    container
}

/// Build a container from the override alone.
pub fn build(name: &str, request: &OverrideRequest) -> Container {
    Container {
        name: name.to_string(),
        image: request.image().map(str::to_string),
        command: if request.command.is_empty() {
            None
        } else {
            Some(request.command.clone())
        },
        args: if request.args.is_empty() {
            None
        } else {
            Some(request.args.clone())
        },
        stdin: Some(request.stdin),
        tty: Some(request.tty),
        ..Default::default()
    }
}
