//! Page templates
//!
//! Templates are registered under `.md` names, which keeps minijinja's
//! auto-escaping off: the `&nbsp;` and `<br>` markers must reach the page
//! verbatim.

pub const MODEL: &str = "model.md";
pub const SEED: &str = "seed.md";
pub const SOURCE: &str = "source.md";
pub const TEST: &str = "test.md";
pub const MACRO: &str = "macro.md";

const COLUMNS: &str = "\
## Columns
| COLUMN | TYPE | DESCRIPTION | TESTS |
| --- | --- | --- | --- |
{% for column in columns -%}
| {{ column.name }} | {{ column.data_type }} | {{ column.description }} | {{ column.tests }} |
{% endfor %}
## Referenced By
| MODELS | TESTS |
| --- | --- |
| {{ referenced_by.models }} | {{ referenced_by.tests }} |
";

pub const MODEL_TEMPLATE: &str = "\
# {{ name }}
{{ materialized }}

## Details
| TAGS | OWNER | TYPE | PACKAGE | LANGUAGE | RELATION |
| --- | --- | --- | --- | --- | --- |
| {{ tags }} | {{ owner }} | {{ materialized }} | {{ package }} | {{ language }} | {{ relation }} |

## Description
{{ description }}

{% include \"columns.md\" %}
## Depends On
| MODELS |
| --- |
| {{ depends_on }} |

## Code
### Source
```{{ language }}
{{ raw_code }}
```
### Compiled
```{{ language }}
{{ compiled_code }}
```
";

pub const SEED_TEMPLATE: &str = "\
# {{ name }}
{{ materialized }}

## Details
| TAGS | OWNER | TYPE | PACKAGE | LANGUAGE | RELATION |
| --- | --- | --- | --- | --- | --- |
| {{ tags }} | {{ owner }} | {{ materialized }} | {{ package }} | {{ language }} | {{ relation }} |

## Description
{{ description }}

{% include \"columns.md\" %}
## Code
### Example SQL
```sql
select
    {{ select_columns }}
from {{ relation }}
```
";

pub const SOURCE_TEMPLATE: &str = "\
# {{ name }}
source table

## Details
| TAGS | OWNER | TYPE | PACKAGE | RELATION | LOADER | SOURCE |
| --- | --- | --- | --- | --- | --- | --- |
| {{ tags }} | {{ owner }} | table | {{ package }} | {{ relation }} | {{ loader }} | {{ source_name }} |

## Description
{{ description }}

{% include \"columns.md\" %}
## Code
### Sample SQL
```sql
select
    {{ select_columns }}
from {{ relation }}
```
";

pub const TEST_TEMPLATE: &str = "\
# {{ name }}
{{ materialized }}

## Description
{{ description }}

## Tested Column
| COLUMN | TEST |
| --- | --- |
| {{ column }} | {{ test_kind }} |

## Depends On
| MODELS |
| --- |
| {{ depends_on }} |

## Code
### Source
```sql
{{ raw_code }}
```
### Compiled
```sql
{{ compiled_code }}
```
";

pub const MACRO_TEMPLATE: &str = "\
# {{ name }}
{{ resource_type }}

## Description
{{ description }}

## Arguments
{% if arguments -%}
| ARGUMENT | TYPE | DESCRIPTION |
| --- | --- | --- |
{% for argument in arguments -%}
| {{ argument.name }} | {{ argument.data_type }} | {{ argument.description }} |
{% endfor -%}
{% else -%}
{{ no_arguments }}
{% endif %}
## Referenced By
| MODELS | MACROS |
| --- | --- |
| {{ referenced_by_models }} | {{ referenced_by_macros }} |

## Depends On
| MODELS | MACROS |
| --- | --- |
| {{ depends_on_models }} | {{ depends_on_macros }} |

## Code
### Source
```sql
{{ macro_sql }}
```
";

/// Every template, by registration name
pub fn all() -> [(&'static str, &'static str); 6] {
    [
        ("columns.md", COLUMNS),
        (MODEL, MODEL_TEMPLATE),
        (SEED, SEED_TEMPLATE),
        (SOURCE, SOURCE_TEMPLATE),
        (TEST, TEST_TEMPLATE),
        (MACRO, MACRO_TEMPLATE),
    ]
}
