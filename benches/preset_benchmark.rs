use criterion::{criterion_group, criterion_main, Criterion};
use prex::generate::{Generator, TemplateFile};
use prex::model::PresetFile;
use prex::registry::PresetRegistry;
use prex::resolve::ActiveGraph;
use std::hint::black_box;

const MOCK_TEMPLATE: &str = r#"{
    "platform": [
        {
            "os": "Windows",
            "generator": "Ninja",
            "C_COMPILER": "clang-cl",
            "CXX_COMPILER": "clang-cl",
            "CMAKE_CXX_STANDARD": "20",
            "toolchain": "C:/vcpkg/scripts/buildsystems/vcpkg.cmake",
            "triplet": "x64-win-llvm",
            "debug_flag": {"CMAKE_CXX_FLAGS": "/EHsc /W3 /Zi /MDd"},
            "rel_flag": {"CMAKE_CXX_FLAGS": "/EHsc /W3 /O2 /MD"}
        },
        {
            "os": "Linux",
            "generator": "Ninja",
            "C_COMPILER": "/usr/bin/clang",
            "CXX_COMPILER": "/usr/bin/clang++",
            "CMAKE_CXX_STANDARD": "20",
            "toolchain": "/opt/vcpkg/scripts/buildsystems/vcpkg.cmake",
            "triplet": "x64-linux-llvm",
            "debug_flag": {"CMAKE_CXX_FLAGS": "-g -O0 -Wall"},
            "rel_flag": {"CMAKE_CXX_FLAGS": "-O2 -DNDEBUG"}
        },
        {
            "os": "Darwin",
            "generator": "Ninja",
            "C_COMPILER": "clang",
            "CXX_COMPILER": "clang++",
            "CMAKE_CXX_STANDARD": "17",
            "toolchain": "/opt/vcpkg/scripts/buildsystems/vcpkg.cmake",
            "triplet": "x64-osx-llvm",
            "debug_flag": {"CMAKE_CXX_FLAGS": "-g -O0 -Wall"},
            "rel_flag": {"CMAKE_CXX_FLAGS": "-O2 -DNDEBUG"}
        }
    ],
    "workflows": [{
        "Flow": [
            {"type": "build", "target": "clang-format", "option": {"ENABLE_CLANG_FORMAT": true}},
            {"type": "build", "target": "clang-tidy-export", "option": {"ENABLE_CLANG_TIDY_EXPORT": false}},
            {"type": "test", "option": {"BUILD_TESTS": true}},
            {
                "type": "test",
                "option": {"BUILD_TESTS": true},
                "args": {
                    "apply_to_build_types": ["debug"],
                    "use_launcher": true,
                    "launcher_command": ["valgrind", "--leak-check=full"],
                    "launcher_test_preset_suffix": "-valgrind"
                }
            }
        ]
    }]
}"#;

fn mock_graph() -> PresetFile {
    let template: TemplateFile = serde_json::from_str(MOCK_TEMPLATE).unwrap();
    Generator::new(&template).generate().unwrap()
}

fn bench_template_parse(c: &mut Criterion) {
    c.bench_function("parse_template", |b| {
        b.iter(|| {
            let _: TemplateFile = serde_json::from_str(black_box(MOCK_TEMPLATE)).unwrap();
        })
    });
}

fn bench_generate(c: &mut Criterion) {
    let template: TemplateFile = serde_json::from_str(MOCK_TEMPLATE).unwrap();
    c.bench_function("generate_graph", |b| {
        b.iter(|| Generator::new(black_box(&template)).generate().unwrap())
    });
}

fn bench_registry_build(c: &mut Criterion) {
    let file = mock_graph();
    c.bench_function("registry_build", |b| {
        b.iter(|| PresetRegistry::build(black_box(&file)))
    });
}

fn bench_resolve_per_host(c: &mut Criterion) {
    let file = mock_graph();
    let registry = PresetRegistry::build(&file);
    c.bench_function("resolve_linux", |b| {
        b.iter(|| ActiveGraph::resolve(black_box(&file), black_box(&registry), black_box("Linux")))
    });
    c.bench_function("resolve_foreign_host", |b| {
        b.iter(|| {
            ActiveGraph::resolve(black_box(&file), black_box(&registry), black_box("FreeBSD"))
        })
    });
}

criterion_group!(
    benches,
    bench_template_parse,
    bench_generate,
    bench_registry_build,
    bench_resolve_per_host
);
criterion_main!(benches);
