//! Default template text for every category.

use super::{Template, TemplateCategory, TemplateError, TemplateSource};

const CLASS: &str = "/**
 * Class ${NAME}
 *
 * @author ${USER}
 * Created on ${DATE}
 */";

const INTERFACE: &str = "/**
 * Interface ${NAME}
 *
 * @author ${USER}
 * Created on ${DATE}
 */";

const ENUM: &str = "/**
 * Enum ${NAME}
 *
 * @author ${USER}
 * Created on ${DATE}
 */";

const FIELD: &str = "/** Field ${NAME} */";

const CONSTRUCTOR: &str = "/**
 * Constructor ${NAME} creates a new ${CLASS} instance.
 */";

const GETTER: &str = "/**
 * Method ${NAME} returns the ${FIELD_NAME} of this ${CLASS} object. ${FIELD_COMMENT}
 *
 * @return the ${FIELD_NAME} (type ${RETURN_TYPE}) of this ${CLASS} object.
 */";

const SETTER: &str = "/**
 * Method ${NAME} sets the ${FIELD_NAME} of this ${CLASS} object. ${FIELD_COMMENT}
 *
 * @param ${PARAM} the ${FIELD_NAME} of this ${CLASS} object.
 */";

const PLAIN_METHOD: &str = "/**
 * Method ${NAME}
 */";

const METHOD_PARAMETER: &str = "@param ${PARAM} of type ${TYPE}";

const METHOD_RETURN: &str = "@return ${RETURN_TYPE}";

const METHOD_THROWS: &str = "@throws ${THROWABLE} when";

/// The built-in templates. Every category is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    fn text(category: TemplateCategory) -> &'static str {
        match category {
            TemplateCategory::Class => CLASS,
            TemplateCategory::Interface => INTERFACE,
            TemplateCategory::Enum => ENUM,
            TemplateCategory::Field => FIELD,
            TemplateCategory::Constructor => CONSTRUCTOR,
            TemplateCategory::Getter => GETTER,
            TemplateCategory::Setter => SETTER,
            TemplateCategory::PlainMethod => PLAIN_METHOD,
            TemplateCategory::MethodParameter => METHOD_PARAMETER,
            TemplateCategory::MethodReturn => METHOD_RETURN,
            TemplateCategory::MethodThrows => METHOD_THROWS,
        }
    }
}

impl TemplateSource for BuiltinTemplates {
    fn load(&self, category: TemplateCategory) -> Result<Template, TemplateError> {
        Ok(Template::new(Self::text(category)))
    }

    fn describe(&self, category: TemplateCategory) -> Option<&str> {
        let description = match category {
            TemplateCategory::Class => "Doc for classes. Placeholders: NAME, PACKAGE, USER, DATE.",
            TemplateCategory::Interface => {
                "Doc for interfaces. Placeholders: NAME, PACKAGE, USER, DATE."
            }
            TemplateCategory::Enum => "Doc for enums. Placeholders: NAME, PACKAGE, USER, DATE.",
            TemplateCategory::Field => "Doc for fields. Placeholders: NAME.",
            TemplateCategory::Constructor => "Doc for constructors. Placeholders: NAME, CLASS.",
            TemplateCategory::Getter => {
                "Doc for getters. Placeholders: NAME, CLASS, FIELD_NAME, FIELD_COMMENT, RETURN_TYPE."
            }
            TemplateCategory::Setter => {
                "Doc for setters. Placeholders: NAME, CLASS, FIELD_NAME, FIELD_COMMENT, PARAM."
            }
            TemplateCategory::PlainMethod => "Doc for other methods. Placeholders: NAME, CLASS.",
            TemplateCategory::MethodParameter => {
                "One line per parameter. Placeholders: PARAM, TYPE."
            }
            TemplateCategory::MethodReturn => "Return value line. Placeholders: RETURN_TYPE.",
            TemplateCategory::MethodThrows => {
                "One line per declared throwable. Placeholders: THROWABLE."
            }
        };
        Some(description)
    }
}
