use std::sync::Arc;

use super::control::{Control, FieldControl, FormGroup, FormResult};
use super::validators::{FieldValidator, GroupValidator};
use super::value::{ControlName, FieldValue};

pub struct FieldBuilder {
    initial: FieldValue,
    validators: Vec<Arc<dyn FieldValidator>>,
}

impl FieldBuilder {
    pub fn new(initial: impl Into<FieldValue>) -> Self {
        Self {
            initial: initial.into(),
            validators: Vec::new(),
        }
    }

    pub fn text(initial: impl Into<String>) -> Self {
        Self::new(FieldValue::Text(initial.into()))
    }

    pub fn boolean(initial: bool) -> Self {
        Self::new(FieldValue::Bool(initial))
    }

    pub fn number(initial: f64) -> Self {
        Self::new(FieldValue::Number(initial))
    }

    pub fn validator(mut self, validator: impl FieldValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    fn into_control(self, name: ControlName) -> FieldControl {
        FieldControl::new(name, self.initial, self.validators)
    }
}

enum ChildBuilder {
    Field(FieldBuilder),
    Group(GroupBuilder),
}

pub struct GroupBuilder {
    children: Vec<(ControlName, ChildBuilder)>,
    validators: Vec<Arc<dyn GroupValidator>>,
}

impl GroupBuilder {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn field(mut self, name: &'static str, field: FieldBuilder) -> Self {
        self.children
            .push((ControlName::new(name), ChildBuilder::Field(field)));
        self
    }

    pub fn group(mut self, name: &'static str, group: GroupBuilder) -> Self {
        self.children
            .push((ControlName::new(name), ChildBuilder::Group(group)));
        self
    }

    pub fn validator(mut self, validator: impl GroupValidator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn build(self) -> FormResult<FormGroup> {
        let root = self.assemble(ControlName::new("form"))?;
        root.revalidate_tree()?;
        Ok(root)
    }

    fn assemble(self, name: ControlName) -> FormResult<FormGroup> {
        let group = FormGroup::empty(name, self.validators);
        for (child_name, child) in self.children {
            let control = match child {
                ChildBuilder::Field(field) => Control::Field(field.into_control(child_name)),
                ChildBuilder::Group(builder) => Control::Group(builder.assemble(child_name)?),
            };
            group.attach(child_name, control)?;
        }
        Ok(group)
    }
}

impl Default for GroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
