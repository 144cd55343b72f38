use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::subscription::SubscriberEntry;
use super::validators::{FieldValidator, GroupValidator, ValidationFailure};
use super::value::{ControlName, FieldValue, FormValue};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    UnknownControl { path: String },
    NotAField { path: String },
    NotAGroup { path: String },
    MissingValue { name: ControlName },
    UnexpectedValue { name: ControlName },
    GroupValueForField { name: ControlName },
    ScalarValueForGroup { name: ControlName },
    SerializeFailed(String),
    OutputFailed(String),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::UnknownControl { path } => {
                write!(f, "no control registered at {path}")
            }
            FormError::NotAField { path } => {
                write!(f, "control at {path} is a group, not a field")
            }
            FormError::NotAGroup { path } => {
                write!(f, "control at {path} is a field, not a group")
            }
            FormError::MissingValue { name } => {
                write!(f, "overwrite is missing a value for {name}")
            }
            FormError::UnexpectedValue { name } => {
                write!(f, "overwrite names {name}, which is not in this group")
            }
            FormError::GroupValueForField { name } => {
                write!(f, "field {name} cannot take a group value")
            }
            FormError::ScalarValueForGroup { name } => {
                write!(f, "group {name} cannot take a scalar value")
            }
            FormError::SerializeFailed(error) => {
                write!(f, "failed to serialize form value: {error}")
            }
            FormError::OutputFailed(error) => {
                write!(f, "failed to emit saved form: {error}")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FieldState {
    pub(super) name: ControlName,
    pub(super) value: FieldValue,
    pub(super) initial: FieldValue,
    pub(super) dirty: bool,
    pub(super) touched: bool,
    pub(super) revision: u64,
    pub(super) validators: Vec<Arc<dyn FieldValidator>>,
    pub(super) failures: Vec<ValidationFailure>,
    pub(super) subscribers: Vec<SubscriberEntry>,
    pub(super) parent: Option<Weak<RwLock<GroupState>>>,
}

pub(super) struct GroupState {
    pub(super) name: ControlName,
    pub(super) children: BTreeMap<ControlName, Control>,
    pub(super) validators: Vec<Arc<dyn GroupValidator>>,
    pub(super) failures: Vec<ValidationFailure>,
    pub(super) parent: Option<Weak<RwLock<GroupState>>>,
}

#[derive(Clone)]
pub struct FieldControl {
    pub(super) state: Arc<RwLock<FieldState>>,
}

#[derive(Clone)]
pub struct FormGroup {
    pub(super) state: Arc<RwLock<GroupState>>,
}

#[derive(Clone)]
pub enum Control {
    Field(FieldControl),
    Group(FormGroup),
}

impl FieldControl {
    pub(super) fn new(
        name: ControlName,
        initial: FieldValue,
        validators: Vec<Arc<dyn FieldValidator>>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(FieldState {
                name,
                value: initial.clone(),
                initial,
                dirty: false,
                touched: false,
                revision: 0,
                validators,
                failures: Vec::new(),
                subscribers: Vec::new(),
                parent: None,
            })),
        }
    }

    pub fn name(&self) -> FormResult<ControlName> {
        Ok(read_lock(&self.state, "reading field name")?.name)
    }

    pub fn value(&self) -> FormResult<FieldValue> {
        Ok(read_lock(&self.state, "reading field value")?.value.clone())
    }

    pub fn is_dirty(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading field edit state")?.dirty)
    }

    pub fn is_pristine(&self) -> FormResult<bool> {
        Ok(!self.is_dirty()?)
    }

    pub fn is_touched(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading field touch state")?.touched)
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading field validity")?.failures.is_empty())
    }

    pub fn failures(&self) -> FormResult<Vec<ValidationFailure>> {
        Ok(read_lock(&self.state, "reading field failures")?.failures.clone())
    }

    pub fn mark_touched(&self) -> FormResult<()> {
        write_lock(&self.state, "marking field touched")?.touched = true;
        Ok(())
    }

    pub fn set_value(&self, value: impl Into<FieldValue>) -> FormResult<()> {
        self.write_value(value.into(), false)
    }

    pub fn input(&self, value: impl Into<FieldValue>) -> FormResult<()> {
        self.write_value(value.into(), true)
    }

    fn write_value(&self, value: FieldValue, user_edit: bool) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "writing field value")?;
            state.value = value;
            state.revision = state.revision.wrapping_add(1);
            if user_edit {
                state.dirty = true;
            }
        }
        // Failures are current before any subscriber observes the new value.
        self.revalidate()?;
        // The debounce window coalesces keystrokes; programmatic writes skip it.
        if user_edit {
            self.notify_subscribers()
        } else {
            self.notify_all_subscribers()
        }
    }

    pub fn set_validators(&self, validators: Vec<Arc<dyn FieldValidator>>) -> FormResult<()> {
        write_lock(&self.state, "replacing field validators")?.validators = validators;
        Ok(())
    }

    pub fn clear_validators(&self) -> FormResult<()> {
        write_lock(&self.state, "clearing field validators")?.validators.clear();
        Ok(())
    }

    pub fn revalidate(&self) -> FormResult<()> {
        self.revalidate_local()?;
        let parent = read_lock(&self.state, "reading field parent")?.parent.clone();
        revalidate_ancestors(parent)
    }

    pub(super) fn revalidate_local(&self) -> FormResult<()> {
        let (value, validators) = {
            let state = read_lock(&self.state, "reading field for validation")?;
            (state.value.clone(), state.validators.clone())
        };
        let failures = validators
            .iter()
            .filter_map(|validator| validator.validate(&value))
            .collect();
        write_lock(&self.state, "storing field failures")?.failures = failures;
        Ok(())
    }

    pub fn reset(&self) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "resetting field")?;
            state.value = state.initial.clone();
            state.dirty = false;
            state.touched = false;
            state.revision = state.revision.wrapping_add(1);
        }
        self.revalidate()?;
        self.notify_all_subscribers()
    }
}

impl FormGroup {
    pub(super) fn empty(name: ControlName, validators: Vec<Arc<dyn GroupValidator>>) -> Self {
        Self {
            state: Arc::new(RwLock::new(GroupState {
                name,
                children: BTreeMap::new(),
                validators,
                failures: Vec::new(),
                parent: None,
            })),
        }
    }

    pub(super) fn attach(&self, name: ControlName, control: Control) -> FormResult<()> {
        let parent = Arc::downgrade(&self.state);
        match &control {
            Control::Field(field) => {
                write_lock(&field.state, "linking field to its group")?.parent = Some(parent);
            }
            Control::Group(group) => {
                write_lock(&group.state, "linking group to its parent")?.parent = Some(parent);
            }
        }
        write_lock(&self.state, "attaching group child")?
            .children
            .insert(name, control);
        Ok(())
    }

    pub fn name(&self) -> FormResult<ControlName> {
        Ok(read_lock(&self.state, "reading group name")?.name)
    }

    pub fn control(&self, path: &str) -> FormResult<Control> {
        let mut current = Control::Group(self.clone());
        for segment in path.split('.') {
            let Control::Group(group) = current else {
                return Err(FormError::NotAGroup {
                    path: path.to_owned(),
                });
            };
            let child = read_lock(&group.state, "walking group children")?
                .children
                .get(segment)
                .cloned();
            let Some(child) = child else {
                return Err(FormError::UnknownControl {
                    path: path.to_owned(),
                });
            };
            current = child;
        }
        Ok(current)
    }

    pub fn field(&self, path: &str) -> FormResult<FieldControl> {
        match self.control(path)? {
            Control::Field(field) => Ok(field),
            Control::Group(_) => Err(FormError::NotAField {
                path: path.to_owned(),
            }),
        }
    }

    pub fn group(&self, path: &str) -> FormResult<FormGroup> {
        match self.control(path)? {
            Control::Group(group) => Ok(group),
            Control::Field(_) => Err(FormError::NotAGroup {
                path: path.to_owned(),
            }),
        }
    }

    pub fn value(&self) -> FormResult<FormValue> {
        let children = read_lock(&self.state, "reading group value")?.children.clone();
        let mut entries = BTreeMap::new();
        for (name, child) in children {
            entries.insert(name, child.value()?);
        }
        Ok(FormValue::Group(entries))
    }

    pub fn set_value(&self, value: FormValue) -> FormResult<()> {
        let FormValue::Group(mut entries) = value else {
            return Err(FormError::ScalarValueForGroup { name: self.name()? });
        };
        let children = read_lock(&self.state, "reading children for overwrite")?
            .children
            .clone();

        enum Staged {
            Field(FieldControl, FieldValue),
            Group(FormGroup, FormValue),
        }

        // Check the shape of this level before touching any child.
        let mut staged = Vec::with_capacity(children.len());
        for (child_name, child) in &children {
            let Some(child_value) = entries.remove(child_name) else {
                return Err(FormError::MissingValue { name: *child_name });
            };
            match child {
                Control::Field(field) => {
                    let FormValue::Scalar(scalar) = child_value else {
                        return Err(FormError::GroupValueForField { name: *child_name });
                    };
                    staged.push(Staged::Field(field.clone(), scalar));
                }
                Control::Group(group) => staged.push(Staged::Group(group.clone(), child_value)),
            }
        }
        if let Some(extra) = entries.keys().next() {
            return Err(FormError::UnexpectedValue { name: *extra });
        }

        for write in staged {
            match write {
                Staged::Field(field, scalar) => field.set_value(scalar)?,
                Staged::Group(group, value) => group.set_value(value)?,
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        let (own_clean, children) = {
            let state = read_lock(&self.state, "reading group validity")?;
            (state.failures.is_empty(), state.children.clone())
        };
        if !own_clean {
            return Ok(false);
        }
        for child in children.values() {
            if !child.is_valid()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn is_pristine(&self) -> FormResult<bool> {
        let children = read_lock(&self.state, "reading group edit state")?
            .children
            .clone();
        for child in children.values() {
            if !child.is_pristine()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn is_touched(&self) -> FormResult<bool> {
        let children = read_lock(&self.state, "reading group touch state")?
            .children
            .clone();
        for child in children.values() {
            if child.is_touched()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn failures(&self) -> FormResult<Vec<ValidationFailure>> {
        Ok(read_lock(&self.state, "reading group failures")?.failures.clone())
    }

    pub fn reset(&self) -> FormResult<()> {
        let children = read_lock(&self.state, "reading children for reset")?
            .children
            .clone();
        for child in children.values() {
            match child {
                Control::Field(field) => field.reset()?,
                Control::Group(group) => group.reset()?,
            }
        }
        Ok(())
    }

    // Runs this group's own validators and hands back the next ancestor.
    pub(super) fn revalidate_own(&self) -> FormResult<Option<Weak<RwLock<GroupState>>>> {
        let validators = read_lock(&self.state, "reading group validators")?
            .validators
            .clone();
        // Group validators read back into the tree, so no lock is held here.
        let failures = validators
            .iter()
            .filter_map(|validator| validator.validate(self))
            .collect();
        let mut state = write_lock(&self.state, "storing group failures")?;
        state.failures = failures;
        Ok(state.parent.clone())
    }

    pub(super) fn revalidate_tree(&self) -> FormResult<()> {
        let children = read_lock(&self.state, "reading children for validation")?
            .children
            .clone();
        for child in children.values() {
            match child {
                Control::Field(field) => field.revalidate_local()?,
                Control::Group(group) => group.revalidate_tree()?,
            }
        }
        self.revalidate_own()?;
        Ok(())
    }
}

impl Control {
    pub fn name(&self) -> FormResult<ControlName> {
        match self {
            Control::Field(field) => field.name(),
            Control::Group(group) => group.name(),
        }
    }

    pub fn value(&self) -> FormResult<FormValue> {
        match self {
            Control::Field(field) => Ok(FormValue::Scalar(field.value()?)),
            Control::Group(group) => group.value(),
        }
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        match self {
            Control::Field(field) => field.is_valid(),
            Control::Group(group) => group.is_valid(),
        }
    }

    pub fn is_pristine(&self) -> FormResult<bool> {
        match self {
            Control::Field(field) => field.is_pristine(),
            Control::Group(group) => group.is_pristine(),
        }
    }

    pub fn is_touched(&self) -> FormResult<bool> {
        match self {
            Control::Field(field) => field.is_touched(),
            Control::Group(group) => group.is_touched(),
        }
    }
}

pub(super) fn revalidate_ancestors(start: Option<Weak<RwLock<GroupState>>>) -> FormResult<()> {
    let mut next = start;
    while let Some(weak) = next {
        let Some(state) = weak.upgrade() else { break };
        next = FormGroup { state }.revalidate_own()?;
    }
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
