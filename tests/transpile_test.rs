use recompose::transpiler::{transpile, transpile_with, TranspileOptions};

#[test]
fn test_counter_component() {
    let input = r#"export default {
  props: {
    foo: String,
  },
  data() {
    return {
      count: 0,
    }
  },
  computed: {
    double() {
      return this.count * 2
    },
  },
  watch: {
    foo(val) {
      this.count = val.length
    },
  },
  methods: {
    inc() {
      this.count++
    },
  },
}
"#;

    let expected = r#"import { computed, defineComponent, reactive, watch } from 'vue'

export const counterProps = {
  foo: String,
}

export const useCounter = (props, context) => {
  const data = reactive({
    count: 0,
  })

  const double = computed(() => {
    return data.count * 2
  })

  watch(() => props.foo, (val) => {
    data.count = val.length
  })

  function inc() {
    data.count++
  }

  return {
    double,
    inc,
  }
}

export default defineComponent({
  props: counterProps,
  setup(props, context) {
    const {} = useCounter(props, context)
    return {}
  },
})
"#;

    let output = transpile(input, "Counter").expect("transpile failed");
    assert_eq!(output, expected);
}

#[test]
fn test_state_references_resolve_everywhere() {
    let input = r#"export default {
  data() {
    return {
      open: false,
    }
  },
  mounted() {
    this.open = true
  },
  methods: {
    toggle() {
      this.open = !this.open
    },
  },
}
"#;
    let output = transpile(input, "Dropdown").unwrap();
    assert!(output.contains("    data.open = true\n"));
    assert!(output.contains("    data.open = !data.open\n"));
    assert!(!output.contains("this."));
}

#[test]
fn test_props_are_resolved_but_not_exported() {
    let input = r#"export default {
  props: ['label'],
  methods: {
    describe() {
      return this.label
    },
  },
}
"#;
    let output = transpile(input, "Badge").unwrap();
    assert!(output.contains("export const badgeProps = ['label']\n"));
    assert!(output.contains("    return props.label\n"));
    assert!(output.contains("  return {\n    describe,\n  }\n"));
}

#[test]
fn test_methods_close_without_trailing_comma() {
    let input = r#"export default {
  methods: {
    first() {
      return 1
    },
    second() {
      return this.first()
    },
  },
}
"#;
    let output = transpile(input, "Pair").unwrap();
    assert!(output.contains(
        "  function first() {\n    return 1\n  }\n  function second() {\n    return first()\n  }\n"
    ));
    assert!(!output.contains("  },\n  function"));
}

#[test]
fn test_getter_and_accessor_pair_computed() {
    let input = r#"export default {
  data() {
    return {
      first: 'Ada',
      last: 'Lovelace',
    }
  },
  computed: {
    full: {
      get() {
        return this.first + ' ' + this.last
      },
      set(value) {
        this.first = value
      },
    },
    initials() {
      return this.first[0] + this.last[0]
    },
  },
}
"#;
    let output = transpile(input, "Person").unwrap();
    assert!(output.contains(
        "  const full = computed({\n    get() {\n      return data.first + ' ' + data.last\n    },\n    set(value) {\n      data.first = value\n    },\n  })\n"
    ));
    assert!(output.contains("  const initials = computed(() => {\n    return data.first[0] + data.last[0]\n  })\n"));
    assert!(output.contains("  return {\n    full,\n    initials,\n  }\n"));
}

#[test]
fn test_ambient_properties_route_through_context() {
    let input = r#"export default {
  methods: {
    close() {
      this.$emit('close')
      this.$router.push('/')
    },
  },
}
"#;
    let output = transpile(input, "Modal").unwrap();
    assert!(output.contains("    context.emit('close')\n"));
    assert!(output.contains("    context.router.push('/')\n"));
}

#[test]
fn test_strings_and_comments_are_not_rewritten() {
    let input = r#"export default {
  methods: {
    log() {
      console.log('this.value is', this.value) // this.value
    },
  },
}
"#;
    let output = transpile(input, "Logger").unwrap();
    assert!(output.contains("    console.log('this.value is', props.value) // this.value\n"));
}

#[test]
fn test_lifecycle_registrations_are_imported() {
    let input = r#"export default {
  mounted() {
    window.addEventListener('resize', this.onResize)
  },
  beforeDestroy() {
    window.removeEventListener('resize', this.onResize)
  },
  methods: {
    onResize() {
    },
  },
}
"#;
    let output = transpile(input, "Chart").unwrap();
    assert!(output.starts_with(
        "import { defineComponent, onBeforeUnmount, onMounted } from 'vue'\n"
    ));
    assert!(output.contains("  onMounted(() => {\n    window.addEventListener('resize', onResize)\n  })\n"));
    assert!(output.contains("  onBeforeUnmount(() => {\n"));
}

#[test]
fn test_configured_framework_module() {
    let options = TranspileOptions {
        framework: "@vue/composition-api".to_string(),
        ..TranspileOptions::default()
    };
    let input = "import { PropType } from '@vue/composition-api'\nexport default {\n  name: 'Tag',\n}\n";
    let output = transpile_with(input, "Tag", &options).unwrap();
    assert!(output.starts_with("import { PropType, defineComponent } from '@vue/composition-api'\n"));
    assert!(output.contains("export default defineComponent({\n  name: 'Tag',\n  props: tagProps,\n"));
}

#[test]
fn test_file_without_options_object_is_rejected() {
    let result = transpile("export function helper() {\n  return 1\n}\n", "Helper");
    assert!(result.is_err());
}

#[test]
fn test_typed_getter_is_annotated() {
    let input = r#"export default {
  data() {
    return {
      count: 0,
    }
  },
  computed: {
    double (): number {
      return this.count * 2
    },
  },
}
"#;
    let output = transpile(input, "Counter").unwrap();
    assert!(output.starts_with("import { Ref, computed, defineComponent, reactive } from 'vue'\n"));
    assert!(output.contains("  const double: Ref<number> = computed(() => {\n    return data.count * 2\n  })"));
    assert!(output.contains("  return {\n    double,\n  }\n"));
}

#[test]
fn test_split_method_header_is_declared_and_returned() {
    let input = r#"export default {
  methods: {
    genItem (
      item,
      index,
    ) {
      return this.genContent(item, index)
    },
    genContent (item) {
      return item
    },
  },
}
"#;
    let output = transpile(input, "List").unwrap();
    assert!(output.contains("  function genItem(item, index) {\n    return genContent(item, index)\n  }\n"));
    assert!(output.contains("  return {\n    genItem,\n    genContent,\n  }\n"));
}
