use std::any::type_name;

use objson_types::{TypeError, TypeTag};

use crate::descriptor::{ObjectFactory, PropertyDescriptor};
use crate::error::{PropertyError, PropertyResult};
use crate::property_type::PropertyType;
use crate::reflect::{PropertyInput, PropertyRef, Reflect, Registered};

type Getter<T> = Box<dyn for<'a> Fn(&'a T) -> PropertyRef<'a> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, PropertyInput) -> Result<(), TypeError> + Send + Sync>;

fn getter<T, F>(f: F) -> Getter<T>
where
    F: for<'a> Fn(&'a T) -> PropertyRef<'a> + Send + Sync + 'static,
{
    Box::new(f)
}

fn setter<T, F>(f: F) -> Setter<T>
where
    F: Fn(&mut T, PropertyInput) -> Result<(), TypeError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn new_boxed<C: Registered + Default>() -> Box<dyn Reflect> {
    Box::new(C::default())
}

fn downcast<C: Registered>(object: Box<dyn Reflect>) -> Result<C, TypeError> {
    let found = object.type_name();
    object
        .into_any()
        .downcast::<C>()
        .map(|boxed| *boxed)
        .map_err(|_| TypeError::Mismatch {
            expected: type_name::<C>(),
            found,
        })
}

/// One entry of a registration table: a name, a declared type, and an
/// accessor pair.
pub struct Property<T: 'static> {
    name: &'static str,
    type_tag: TypeTag,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
    factory: Option<ObjectFactory>,
}

impl<T: 'static> Property<T> {
    /// A readable and writable plain-valued property.
    pub fn value<V: PropertyType>(
        name: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        Self {
            name,
            type_tag: V::type_tag(),
            getter: Some(value_getter(get)),
            setter: Some(value_setter(set)),
            factory: None,
        }
    }

    /// A plain-valued property without a setter.
    pub fn read_only<V: PropertyType>(name: &'static str, get: fn(&T) -> V) -> Self {
        Self {
            name,
            type_tag: V::type_tag(),
            getter: Some(value_getter(get)),
            setter: None,
            factory: None,
        }
    }

    /// A plain-valued property without a getter. It is never encoded.
    pub fn write_only<V: PropertyType>(name: &'static str, set: fn(&mut T, V)) -> Self {
        Self {
            name,
            type_tag: V::type_tag(),
            getter: None,
            setter: Some(value_setter(set)),
            factory: None,
        }
    }

    /// A nested object property. `get` returns `None` when the reference is
    /// unset; `set` receives a freshly decoded instance and owns it from then
    /// on.
    pub fn object<C: Registered + Default>(
        name: &'static str,
        get: fn(&T) -> Option<&C>,
        set: fn(&mut T, C),
    ) -> Self {
        Self {
            name,
            type_tag: TypeTag::NestedObject,
            getter: Some(getter(move |t: &T| {
                PropertyRef::Object(get(t).map(|c| c as &dyn Reflect))
            })),
            setter: Some(setter(move |t: &mut T, input| match input {
                PropertyInput::Object(object) => {
                    set(t, downcast::<C>(object)?);
                    Ok(())
                }
                other => Err(TypeError::Mismatch {
                    expected: "object",
                    found: other.kind_name(),
                }),
            })),
            factory: Some(new_boxed::<C>),
        }
    }

    /// A homogeneous list of nested objects.
    pub fn object_list<C: Registered + Default>(
        name: &'static str,
        get: fn(&T) -> &[C],
        set: fn(&mut T, Vec<C>),
    ) -> Self {
        Self {
            name,
            type_tag: TypeTag::NestedObjectList,
            getter: Some(getter(move |t: &T| {
                PropertyRef::ObjectList(get(t).iter().map(|c| c as &dyn Reflect).collect())
            })),
            setter: Some(setter(move |t: &mut T, input| match input {
                PropertyInput::ObjectList(objects) => {
                    let items = objects
                        .into_iter()
                        .map(downcast::<C>)
                        .collect::<Result<Vec<_>, _>>()?;
                    set(t, items);
                    Ok(())
                }
                other => Err(TypeError::Mismatch {
                    expected: "object list",
                    found: other.kind_name(),
                }),
            })),
            factory: Some(new_boxed::<C>),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name,
            type_tag: self.type_tag,
            readable: self.getter.is_some(),
            writable: self.setter.is_some(),
            factory: self.factory,
        }
    }
}

fn value_getter<T: 'static, V: PropertyType>(get: fn(&T) -> V) -> Getter<T> {
    getter(move |t: &T| PropertyRef::Value(get(t).into_value()))
}

fn value_setter<T: 'static, V: PropertyType>(set: fn(&mut T, V)) -> Setter<T> {
    setter(move |t: &mut T, input| match input {
        PropertyInput::Value(value) => {
            set(t, V::from_value(value)?);
            Ok(())
        }
        other => Err(TypeError::Mismatch {
            expected: "value",
            found: other.kind_name(),
        }),
    })
}

/// Static registration table for one type: properties in declaration order.
pub struct PropertyTable<T: 'static> {
    type_name: &'static str,
    properties: Vec<Property<T>>,
}

impl<T: 'static> PropertyTable<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            properties: Vec::new(),
        }
    }

    /// Append a property. A duplicate name replaces the earlier entry in
    /// place, keeping its position.
    pub fn with(mut self, property: Property<T>) -> Self {
        match self.properties.iter().position(|p| p.name == property.name) {
            Some(index) => self.properties[index] = property,
            None => self.properties.push(property),
        }
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn descriptors(&self) -> Vec<PropertyDescriptor> {
        self.properties.iter().map(Property::descriptor).collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.find(name).map(Property::descriptor)
    }

    /// Read a property of `object`.
    pub fn get<'a>(&self, object: &'a T, name: &str) -> Option<PropertyRef<'a>> {
        let get = self.find(name)?.getter.as_ref()?;
        Some(get(object))
    }

    /// Write a property of `object`.
    pub fn set(&self, object: &mut T, name: &str, input: PropertyInput) -> PropertyResult<()> {
        let property = self
            .find(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        let set = property
            .setter
            .as_ref()
            .ok_or_else(|| PropertyError::NotWritable(name.to_string()))?;
        set(object, input).map_err(|source| PropertyError::Rejected {
            property: name.to_string(),
            source,
        })
    }

    fn find(&self, name: &str) -> Option<&Property<T>> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use objson_types::{PrimitiveKind, PropertyValue};

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Wheel {
        size: u32,
    }

    impl Registered for Wheel {
        fn registry() -> &'static PropertyTable<Self> {
            static TABLE: OnceLock<PropertyTable<Wheel>> = OnceLock::new();
            TABLE.get_or_init(|| {
                PropertyTable::new("Wheel")
                    .with(Property::value("size", |w: &Wheel| w.size, |w, v| w.size = v))
            })
        }
    }

    #[derive(Debug, Default)]
    struct Car {
        name: String,
        serial: u64,
        secret: String,
        spare: Option<Wheel>,
        wheels: Vec<Wheel>,
    }

    impl Registered for Car {
        fn registry() -> &'static PropertyTable<Self> {
            static TABLE: OnceLock<PropertyTable<Car>> = OnceLock::new();
            TABLE.get_or_init(|| {
                PropertyTable::new("Car")
                    .with(Property::value("name", |c: &Car| c.name.clone(), |c, v| c.name = v))
                    .with(Property::read_only("serial", |c: &Car| c.serial))
                    .with(Property::write_only("secret", |c: &mut Car, v| c.secret = v))
                    .with(Property::object("spare", |c: &Car| c.spare.as_ref(), |c, w| {
                        c.spare = Some(w)
                    }))
                    .with(Property::object_list("wheels", |c: &Car| c.wheels.as_slice(), |c, w| {
                        c.wheels = w
                    }))
            })
        }
    }

    #[test]
    fn descriptors_follow_declaration_order() {
        let car = Car::default();
        let names: Vec<_> = car.descriptors().iter().map(|d| d.name).collect();
        assert_eq!(names, ["name", "serial", "secret", "spare", "wheels"]);
    }

    #[test]
    fn descriptor_flags_and_tags() {
        let car = Car::default();
        let serial = car.descriptor("serial").unwrap();
        assert!(serial.readable);
        assert!(!serial.writable);
        assert_eq!(serial.type_tag, TypeTag::Primitive(PrimitiveKind::UInt));

        let secret = car.descriptor("secret").unwrap();
        assert!(!secret.readable);
        assert!(secret.writable);

        let spare = car.descriptor("spare").unwrap();
        assert_eq!(spare.type_tag, TypeTag::NestedObject);
        let fresh = spare.new_instance().unwrap();
        assert_eq!(fresh.type_name(), "Wheel");
    }

    #[test]
    fn get_and_set_plain_values() {
        let mut car = Car::default();
        let object: &mut dyn Reflect = &mut car;
        object.set_value("name", PropertyValue::from("beetle")).unwrap();
        assert_eq!(object.get_value("name"), Some(PropertyValue::from("beetle")));
        assert!(object.get_value("secret").is_none());
    }

    #[test]
    fn set_errors() {
        let mut car = Car::default();
        let object: &mut dyn Reflect = &mut car;

        let err = object.set_value("missing", PropertyValue::Null).unwrap_err();
        assert_eq!(err, PropertyError::Unknown("missing".into()));

        let err = object.set_value("serial", PropertyValue::UInt(1)).unwrap_err();
        assert_eq!(err, PropertyError::NotWritable("serial".into()));

        let err = object.set_value("name", PropertyValue::Int(1)).unwrap_err();
        assert!(matches!(err, PropertyError::Rejected { ref property, .. } if property == "name"));
    }

    #[test]
    fn nested_objects_are_owned_by_parent() {
        let mut car = Car::default();
        let spare = Box::new(Wheel { size: 15 });
        car.set_property("spare", PropertyInput::Object(spare)).unwrap();
        assert_eq!(car.spare, Some(Wheel { size: 15 }));

        let Some(PropertyRef::Object(Some(obj))) = car.get_property("spare") else {
            panic!("expected nested object");
        };
        assert_eq!(obj.downcast_ref::<Wheel>(), Some(&Wheel { size: 15 }));
    }

    #[test]
    fn object_of_wrong_type_is_rejected() {
        let mut car = Car::default();
        let err = car
            .set_property("spare", PropertyInput::Object(Box::new(Car::default())))
            .unwrap_err();
        assert!(matches!(
            err,
            PropertyError::Rejected {
                source: TypeError::Mismatch { found: "Car", .. },
                ..
            }
        ));
        assert!(car.spare.is_none());
    }

    #[test]
    fn object_lists() {
        let mut car = Car::default();
        let wheels: Vec<Box<dyn Reflect>> = (0..4)
            .map(|i| Box::new(Wheel { size: 14 + i }) as Box<dyn Reflect>)
            .collect();
        car.set_property("wheels", PropertyInput::ObjectList(wheels)).unwrap();
        assert_eq!(car.wheels.len(), 4);
        assert_eq!(car.wheels[3].size, 17);

        let Some(PropertyRef::ObjectList(items)) = car.get_property("wheels") else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn duplicate_name_replaces_in_place() {
        let table: PropertyTable<Wheel> = PropertyTable::new("Wheel")
            .with(Property::value("size", |w: &Wheel| w.size, |w, v| w.size = v))
            .with(Property::read_only("size", |w: &Wheel| w.size));
        assert_eq!(table.len(), 1);
        assert!(!table.descriptor("size").unwrap().writable);
    }
}
