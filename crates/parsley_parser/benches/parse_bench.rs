use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use parsley_ast::Syntax;
use parsley_core::AstArena;
use parsley_parser::{parse, tokenize, ParseOptions};

/// Plain script with regexes, templates, destructuring and classes.
const SCRIPT_SOURCE: &str = r#"
'use strict';
const WORD = /\b([a-z]+)\b/gi;

function countWords(text, { minLength = 1, ignore = [] } = {}) {
    const counts = new Map();
    for (const [, word] of text.matchAll(WORD)) {
        const key = word.toLowerCase();
        if (key.length < minLength || ignore.includes(key)) continue;
        counts.set(key, (counts.get(key) ?? 0) + 1);
    }
    return [...counts].sort((a, b) => b[1] - a[1] || (a[0] < b[0] ? -1 : 1));
}

class Report {
    #rows = [];
    static header = `| word | count |`;

    add(word, count) {
        this.#rows.push(`| ${word} | ${count} |`);
        return this;
    }

    get size() { return this.#rows.length; }

    render() {
        return [Report.header, ...this.#rows].join('\n');
    }
}

async function* lines(stream) {
    let rest = '';
    for await (const chunk of stream) {
        const parts = (rest + chunk).split(/\r?\n/);
        rest = parts.pop();
        yield* parts;
    }
    if (rest) yield rest;
}

label: for (let i = 0, j = 10; i < j; i++, j--) {
    if (i % 3 === 0) continue label;
    x = a / b / c, y = i >>> 2;
}
"#;

/// TSX component with generics, interfaces and type-level constructs.
const TSX_SOURCE: &str = r#"
import React, { type ReactNode, useMemo } from 'react';

interface Column<Row> {
    key: keyof Row & string;
    title: string;
    render?(row: Row): ReactNode;
}

type Sorted<T> = T extends readonly (infer U)[] ? U[] : never;
type Handlers = { [K in 'click' | 'hover' as `on${Capitalize<K>}`]?: () => void };

enum Align { Left, Center = 'center', Right = 1 << 2 }

export function Table<Row extends { id: string }>({ rows, columns }: {
    rows: Row[];
    columns: Column<Row>[];
}) {
    const sorted = useMemo(() => [...rows].sort((a, b) => a.id < b.id ? -1 : 1), [rows]);
    const pick = <T,>(value: T): T => value;
    return (
        <table className="grid">
            <thead>
                <tr>{columns.map(c => <th key={c.key} align={Align.Left as any}>{c.title}</th>)}</tr>
            </thead>
            <tbody>
                {sorted.map(row => (
                    <tr key={row.id}>
                        {columns.map(c => <td key={c.key}>{c.render?.(row) ?? String(row[c.key])}</td>)}
                    </tr>
                ))}
            </tbody>
            <>&nbsp;{pick(sorted.length)} rows</>
        </table>
    );
}

export default abstract class Store<S> {
    protected constructor(private readonly initial: S) {}
    abstract reduce(state: S, action: { type: string }): S;
}
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.throughput(Throughput::Bytes(SCRIPT_SOURCE.len() as u64));
    let script = ParseOptions::new(SCRIPT_SOURCE);
    group.bench_function("script", |b| {
        b.iter(|| {
            let arena = AstArena::new();
            let root = parse(&arena, black_box(&script));
            black_box(root.map(|root| root.statements.len()))
        });
    });

    group.throughput(Throughput::Bytes(TSX_SOURCE.len() as u64));
    let tsx = ParseOptions::new(TSX_SOURCE).with_syntax([Syntax::Jsx, Syntax::Ts]);
    group.bench_function("tsx", |b| {
        b.iter(|| {
            let arena = AstArena::with_capacity(TSX_SOURCE.len() * 8);
            let root = parse(&arena, black_box(&tsx));
            black_box(root.map(|root| root.statements.len()))
        });
    });

    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let options = ParseOptions::new(TSX_SOURCE).with_syntax([Syntax::Jsx, Syntax::Ts]);
    c.bench_function("tokenize_tsx", |b| {
        b.iter(|| black_box(tokenize(black_box(&options)).map(|tokens| tokens.len())));
    });
}

criterion_group!(benches, bench_parse, bench_tokenize);
criterion_main!(benches);
