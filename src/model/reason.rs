//! Why a dependency is used the way it is
//!
//! Every usage observation carries one or more reasons. Each reason implies a
//! configuration; explanations print it as `(implies <configuration>).`

use super::{qualified_configuration, Variant};
use serde::{Deserialize, Serialize};

/// Items listed in a reason before the rest are elided
const LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorSource {
    Imports,
    Classes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndroidComponent {
    Activity,
    Provider,
    Receiver,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reason {
    /// Classes exposed in the ABI
    Abi { classes: Vec<String> },
    AnnotationProcessor {
        items: Vec<String>,
        source: ProcessorSource,
        #[serde(default)]
        is_kapt: bool,
    },
    /// Only the summary is printed; nothing is implied
    BinaryIncompatible { details: Vec<String> },
    CompileTimeAnnotations,
    Constant { constants: Vec<String> },
    Impl { classes: Vec<String> },
    /// Super classes or interfaces of used classes
    ImplSuper { classes: Vec<String> },
    /// Classes referenced from an annotation
    Annotation { classes: Vec<String> },
    /// Classes referenced only from annotations invisible at runtime
    InvisibleAnnotation { classes: Vec<String> },
    Imported { imports: Vec<String> },
    TestInstrumentationRunner { runner: String },
    Inline { members: Vec<String> },
    LintJar { registry: String },
    NativeLib { files: Vec<String> },
    ResBySrc { imports: Vec<String> },
    ResByRes { resources: Vec<String> },
    /// Resources referenced only at runtime
    ResByResRuntime { resources: Vec<String> },
    Asset { assets: Vec<String> },
    RuntimeAndroid {
        component: AndroidComponent,
        names: Vec<String>,
    },
    SecurityProvider { providers: Vec<String> },
    ServiceLoader { providers: Vec<String> },
    Typealias { classes: Vec<String> },
    Undeclared,
    Unused,
    Excluded,
}

#[derive(Clone, Copy)]
enum Kind {
    AndroidActivity,
    AndroidAsset,
    AndroidProvider,
    AndroidRes,
    AndroidService,
    AndroidTestInstrumentationRunner,
    Annotation,
    Class,
    Constant,
    InlineMember,
    LintRegistry,
    NativeBinary,
    AndroidReceiver,
    SecurityProvider,
    ServiceLoader,
    Typealias,
}

impl Kind {
    fn names(self) -> (&'static str, &'static str) {
        match self {
            Kind::AndroidActivity => ("Android Activity", "Android Activities"),
            Kind::AndroidAsset => ("asset", "assets"),
            Kind::AndroidProvider => ("Android Provider", "Android Providers"),
            Kind::AndroidRes => ("resource", "resources"),
            Kind::AndroidService => ("Android Service", "Android Services"),
            Kind::AndroidTestInstrumentationRunner => {
                ("test instrumentation runner", "test instrumentation runners")
            }
            Kind::Annotation => ("annotation", "annotations"),
            Kind::Class => ("class", "classes"),
            Kind::Constant => ("constant", "constants"),
            Kind::InlineMember => ("inline member", "inline members"),
            Kind::LintRegistry => ("lint registry", "lint registries"),
            Kind::NativeBinary => ("native binary", "native binaries"),
            Kind::AndroidReceiver => ("Android Receiver", "Android Receivers"),
            Kind::SecurityProvider => ("security provider", "security providers"),
            Kind::ServiceLoader => ("service loader", "service loaders"),
            Kind::Typealias => ("typealias", "typealiases"),
        }
    }
}

fn build_reason<S: AsRef<str>>(items: &[S], prefix: &str, kind: Kind) -> String {
    let (singular, plural) = kind.names();
    let count = items.len();

    let head = if count == 1 {
        format!("{} 1 {}: ", prefix, singular)
    } else if count <= LIMIT {
        format!("{} {} {}: ", prefix, count, plural)
    } else {
        format!("{} {} {}, {} of which are shown: ", prefix, count, plural, LIMIT)
    };

    let shown: Vec<&str> = items.iter().take(LIMIT).map(|s| s.as_ref()).collect();
    head + &shown.join(", ")
}

impl Reason {
    /// Configuration this reason implies, unqualified
    pub fn configuration_name(&self) -> &'static str {
        match self {
            Reason::Abi { .. } => "api",
            Reason::AnnotationProcessor { is_kapt: true, .. } => "kapt",
            Reason::AnnotationProcessor { .. } => "annotationProcessor",
            Reason::CompileTimeAnnotations | Reason::InvisibleAnnotation { .. } => "compileOnly",
            Reason::Annotation { .. } => "implementation, sometimes",
            Reason::Constant { .. }
            | Reason::Impl { .. }
            | Reason::ImplSuper { .. }
            | Reason::Imported { .. }
            | Reason::Inline { .. }
            | Reason::LintJar { .. }
            | Reason::ResBySrc { .. }
            | Reason::ResByRes { .. }
            | Reason::Typealias { .. } => "implementation",
            Reason::TestInstrumentationRunner { .. }
            | Reason::NativeLib { .. }
            | Reason::ResByResRuntime { .. }
            | Reason::Asset { .. }
            | Reason::RuntimeAndroid { .. }
            | Reason::SecurityProvider { .. }
            | Reason::ServiceLoader { .. } => "runtimeOnly",
            Reason::BinaryIncompatible { .. }
            | Reason::Undeclared
            | Reason::Unused
            | Reason::Excluded => "n/a",
        }
    }

    /// Markers that record absence rather than usage
    pub fn is_marker(&self) -> bool {
        matches!(self, Reason::Undeclared | Reason::Unused | Reason::Excluded)
    }

    pub fn is_compile_time_annotations(&self) -> bool {
        matches!(self, Reason::CompileTimeAnnotations)
    }

    /// The observation itself, e.g. `Uses 2 classes: a.A, a.B`
    pub fn summary(&self) -> String {
        match self {
            Reason::Abi { classes } => build_reason(classes, "Exposes", Kind::Class),
            Reason::AnnotationProcessor { items, source, .. } => {
                let prefix = match source {
                    ProcessorSource::Imports => "Imports",
                    ProcessorSource::Classes => "Uses",
                };
                build_reason(items, prefix, Kind::Annotation)
            }
            Reason::BinaryIncompatible { details } => format!(
                "Is binary-incompatible, and should be removed from the classpath:\n  {}",
                details.join("\n  ")
            ),
            Reason::CompileTimeAnnotations => "Provides compile-time annotations".to_string(),
            Reason::Constant { constants } => build_reason(constants, "Imports", Kind::Constant),
            Reason::Impl { classes } => build_reason(classes, "Uses", Kind::Class),
            Reason::ImplSuper { classes } => {
                build_reason(classes, "Uses (as a supertype)", Kind::Class)
            }
            Reason::Annotation { classes } => {
                build_reason(classes, "Uses (in an annotation)", Kind::Class)
            }
            Reason::InvisibleAnnotation { classes } => {
                build_reason(classes, "Uses (in an invisible annotation)", Kind::Class)
            }
            Reason::Imported { imports } => build_reason(imports, "Imports", Kind::Class),
            Reason::TestInstrumentationRunner { runner } => build_reason(
                std::slice::from_ref(runner),
                "Declares",
                Kind::AndroidTestInstrumentationRunner,
            ),
            Reason::Inline { members } => build_reason(members, "Imports", Kind::InlineMember),
            Reason::LintJar { registry } => {
                build_reason(std::slice::from_ref(registry), "Provides", Kind::LintRegistry)
            }
            Reason::NativeLib { files } => build_reason(files, "Provides", Kind::NativeBinary),
            Reason::ResBySrc { imports } => build_reason(imports, "Imports", Kind::AndroidRes),
            Reason::ResByRes { resources } => build_reason(resources, "Uses", Kind::AndroidRes),
            Reason::ResByResRuntime { resources } => {
                build_reason(resources, "Uses (at runtime)", Kind::AndroidRes)
            }
            Reason::Asset { assets } => build_reason(assets, "Provides", Kind::AndroidAsset),
            Reason::RuntimeAndroid { component, names } => {
                let kind = match component {
                    AndroidComponent::Activity => Kind::AndroidActivity,
                    AndroidComponent::Provider => Kind::AndroidProvider,
                    AndroidComponent::Receiver => Kind::AndroidReceiver,
                    AndroidComponent::Service => Kind::AndroidService,
                };
                build_reason(names, "Provides", kind)
            }
            Reason::SecurityProvider { providers } => {
                build_reason(providers, "Provides", Kind::SecurityProvider)
            }
            Reason::ServiceLoader { providers } => {
                build_reason(providers, "Provides", Kind::ServiceLoader)
            }
            Reason::Typealias { classes } => build_reason(classes, "Uses", Kind::Typealias),
            Reason::Undeclared => "undeclared".to_string(),
            Reason::Unused => "unused".to_string(),
            Reason::Excluded => "excluded".to_string(),
        }
    }

    /// Summary plus the implied configuration for `variant`
    ///
    /// When the dependency provides compile-time annotations every reason
    /// except annotation processing implies `compileOnly`.
    pub fn describe(&self, variant: &Variant, is_compile_only: bool) -> String {
        if let Reason::BinaryIncompatible { .. } = self {
            return self.summary();
        }

        let effective = if matches!(self, Reason::AnnotationProcessor { .. }) || !is_compile_only {
            self.configuration_name()
        } else {
            "compileOnly"
        };

        format!(
            "{} (implies {}).",
            self.summary(),
            qualified_configuration(variant, effective)
        )
    }
}
