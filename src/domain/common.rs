/// Supplies a presentation-ready label for prompts or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
