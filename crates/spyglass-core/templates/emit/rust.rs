// This code was generated by Spyglass.
{% if unit.has_namespace -%}
// namespace: {{ unit.namespace }}
{% endif -%}
{% for line in unit.imports -%}
{{ line }}
{% endfor -%}
{% for ty in unit.types %}
pub struct {{ ty.name }};

impl {% if ty.has_base %}{{ ty.base }} for {% endif %}{{ ty.name }} {
{%- for method in ty.methods %}
    fn {{ method.name }}(&mut self) {
{%- for line in method.lines %}
        {{ line }}
{%- endfor %}
    }
{%- endfor %}
}
{% endfor %}
