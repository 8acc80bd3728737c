//! # C target emitter
//!
//! Lowers a program's IR into a standalone C translation unit using
//! computed `goto`-style labeled blocks over a sparse `{positive, negative}`
//! cell arena, mirroring `original_source/hbcht.py`'s `_c_compile` and its
//! embedded C runtime template.

use std::fmt::Write as _;

use crate::ir::{Opcode, Program};

const RUNTIME_PREFIX: &str = "
#include <stdio.h>
#include <stdlib.h>
#include <errno.h>
#include <time.h>
#include <string.h>

typedef struct {
    int *items;
    int length;
} HbchtIntList;

typedef struct {
    HbchtIntList *positive;
    HbchtIntList *negative;
} HbchtCells;

static void hbcht_intlist_init(HbchtIntList **list) {
    *list = (HbchtIntList *) malloc(sizeof(HbchtIntList));
    if (*list == NULL) exit(EXIT_FAILURE);
    (*list)->length = 0;
    (*list)->items = NULL;
}

static void hbcht_intlist_destroy(HbchtIntList *list) {
    free(list->items);
    free(list);
}

static void hbcht_cells_init(HbchtCells **cells) {
    *cells = (HbchtCells *) malloc(sizeof(HbchtCells));
    if (*cells == NULL) exit(EXIT_FAILURE);
    hbcht_intlist_init(&(*cells)->positive);
    hbcht_intlist_init(&(*cells)->negative);
}

static void hbcht_cells_destroy(HbchtCells *cells) {
    hbcht_intlist_destroy(cells->positive);
    hbcht_intlist_destroy(cells->negative);
    free(cells);
}

static void hbcht_intlist_add(HbchtIntList *list, int pos, int delta) {
    int old_length = list->length;
    if (pos >= list->length) {
        list->length = pos + 1;
        list->items = (int *) realloc(list->items, sizeof(int) * list->length);
        if (list->items == NULL) exit(EXIT_FAILURE);
        for (int i = old_length; i < list->length; i++)
            list->items[i] = 0;
    }
    list->items[pos] += delta;
}

static void hbcht_add_cell(HbchtCells *cells, int pos, int delta) {
    if (pos >= 0)
        hbcht_intlist_add(cells->positive, pos, delta);
    else
        hbcht_intlist_add(cells->negative, -pos - 1, delta);
}

static int hbcht_get_cell(HbchtCells *cells, int pos) {
    if (pos >= 0)
        return pos < cells->positive->length ? cells->positive->items[pos] : 0;
    return -pos - 1 < cells->negative->length ? cells->negative->items[-pos - 1] : 0;
}

typedef struct {
    int *items;
    int length;
    int offset;
} HbchtCellList;

static HbchtCellList hbcht_cells_to_list(HbchtCells *cells) {
    HbchtCellList out = {NULL, 0, cells->negative->length};
    int total = cells->negative->length + cells->positive->length;
    if (total == 0)
        return out;
    out.items = (int *) malloc(sizeof(int) * total);
    if (out.items == NULL) exit(EXIT_FAILURE);
    int k = 0;
    for (int i = cells->negative->length - 1; i >= 0; i--, k++)
        out.items[k] = cells->negative->items[i];
    for (int i = 0; i < cells->positive->length; i++, k++)
        out.items[k] = cells->positive->items[i];
    out.length = total;
    return out;
}
";

const MAIN_FUNC: &str = "
int main(int argc, char *argv[]) {
    int count = argc - 1;
    int *inputs = (int *) malloc(sizeof(int) * (count > 0 ? count : 1));
    if (inputs == NULL) exit(EXIT_FAILURE);
    for (int i = 0; i < count; i++) {
#ifdef HBCHT_INPUT_AS_TEXT
        inputs[i] = argv[i + 1][0];
#else
        char *end;
        errno = 0;
        long value = strtol(argv[i + 1], &end, 10);
        inputs[i] = (errno == 0 && *end == '\\0') ? (int) value : argv[i + 1][0];
#endif
    }
    char *formatted = hbcht_run_format(inputs, count);
    free(inputs);
    if (formatted == NULL) {
        fprintf(stderr, \"input values must be non-negative\\n\");
        return EXIT_FAILURE;
    }
    printf(\"%s\", formatted);
    free(formatted);
    return EXIT_SUCCESS;
}
";

/// Emit the per-opcode labeled block body, appended inside `hbcht_run`'s
/// own scope so its `goto hbchtpos*` labels stay in one function.
fn emit_blocks(program: &Program) -> String {
    let starts = super::block_starts(program);
    let n = program.instructions.len();

    let mut body = String::new();
    body.push_str("    switch (hbcht_entry) {\n");
    body.push_str("    case 0: goto hbchtpos0;\n");
    let labeled_entries = [
        (1, program.entries.right),
        (2, program.entries.down),
        (3, program.entries.left),
    ];
    for (case, offset) in labeled_entries {
        let _ = writeln!(body, "    case {case}: goto hbchtpos{offset};");
    }
    body.push_str("    }\n");
    body.push_str("hbchtpos0:\n");

    let mut last_was_terminal = false;
    for (j, inst) in program.instructions.iter().enumerate() {
        if j != 0 && starts.contains(&j) {
            if !last_was_terminal {
                let _ = writeln!(body, "    goto hbchtpos{j};");
            }
            let _ = writeln!(body, "hbchtpos{j}:");
        }

        match inst.op {
            Opcode::Dec => {
                let _ = writeln!(body, "    hbcht_add_cell(cells, i, -{});", inst.arg);
            }
            Opcode::Inc => {
                let _ = writeln!(body, "    hbcht_add_cell(cells, i, {});", inst.arg);
            }
            Opcode::PrevCell => {
                let _ = writeln!(body, "    i -= {};", inst.arg);
            }
            Opcode::NextCell => {
                let _ = writeln!(body, "    i += {};", inst.arg);
            }
            Opcode::Goto => {
                let _ = writeln!(body, "    goto hbchtpos{};", inst.arg);
            }
            Opcode::If => {
                body.push_str("    if (hbcht_get_cell(cells, i) != hbcht_get_cell(cells, i - 1))\n");
                let _ = writeln!(body, "        goto hbchtpos{};", inst.arg);
            }
            Opcode::Exit => {
                body.push_str("    goto hbchtposend;\n");
                let next = j + 1;
                if next < n && !starts.contains(&next) {
                    let _ = writeln!(body, "hbchtpos{next}:");
                }
            }
        }
        last_was_terminal = matches!(inst.op, Opcode::Goto | Opcode::Exit);
    }
    body.push_str("hbchtposend:\n    ;\n");
    body
}

/// Emit `program` as a standalone C translation unit. `function_only`
/// omits `main`, leaving `hbcht_run`/`hbcht_run_format` as a library
/// surface for another C program to link against.
pub fn emit(program: &Program, function_only: bool) -> String {
    let mut out = String::new();
    out.push_str("/* Generated by the hbcht toolchain. */\n");
    if program.input_as_text {
        out.push_str("#define HBCHT_INPUT_AS_TEXT\n");
    }
    if program.output_as_text {
        out.push_str("#define HBCHT_OUTPUT_AS_TEXT\n");
    }
    out.push_str(RUNTIME_PREFIX);

    out.push_str("\nstatic HbchtCellList hbcht_run(const int *inputs, int count, int hbcht_entry) {\n");
    out.push_str("    HbchtCells *cells;\n");
    out.push_str("    int i = 0;\n");
    out.push_str("    hbcht_cells_init(&cells);\n");
    out.push_str("    for (int k = 0; k < count; k++)\n");
    out.push_str("        hbcht_add_cell(cells, k, inputs[k]);\n");
    out.push_str(&emit_blocks(program));
    out.push_str("    HbchtCellList result = hbcht_cells_to_list(cells);\n");
    out.push_str("    hbcht_cells_destroy(cells);\n");
    out.push_str("    return result;\n");
    out.push_str("}\n");

    out.push_str("\nchar *hbcht_run_format(const int *inputs, int count) {\n");
    out.push_str("    for (int k = 0; k < count; k++)\n");
    out.push_str("        if (inputs[k] < 0) return NULL;\n");
    out.push_str("    srand((unsigned) time(NULL));\n");
    out.push_str("    HbchtCellList list = hbcht_run(inputs, count, rand() % 4);\n");
    out.push_str("    char *result;\n");
    out.push_str("#ifdef HBCHT_OUTPUT_AS_TEXT\n");
    out.push_str("    result = (char *) malloc(sizeof(char) * (list.length + 1));\n");
    out.push_str("    if (result == NULL) exit(EXIT_FAILURE);\n");
    out.push_str("    int w = 0;\n");
    out.push_str("    for (int k = 0; k < list.length; k++)\n");
    out.push_str("        if (list.items[k] != 0) result[w++] = (char) list.items[k];\n");
    out.push_str("    result[w] = '\\0';\n");
    out.push_str("#else\n");
    out.push_str("    if (list.length == 0) {\n");
    out.push_str("        result = (char *) malloc(8);\n");
    out.push_str("        if (result == NULL) exit(EXIT_FAILURE);\n");
    out.push_str("        strcpy(result, \"(empty)\");\n");
    out.push_str("    } else {\n");
    out.push_str("        int first_k = -1, last_k = -1;\n");
    out.push_str("        for (int k = 0; k < list.length; k++)\n");
    out.push_str("            if (list.items[k] != 0) { if (first_k < 0) first_k = k; last_k = k; }\n");
    out.push_str("        char tmp[16];\n");
    out.push_str("        sprintf(tmp, \"%d\", first_k - list.offset);\n");
    out.push_str("        int width = (int) strlen(tmp);\n");
    out.push_str("        sprintf(tmp, \"%d\", last_k - list.offset);\n");
    out.push_str("        if ((int) strlen(tmp) > width) width = (int) strlen(tmp);\n");
    out.push_str("        char fmt[16];\n");
    out.push_str("        sprintf(fmt, \"%%%dd: %%d\\n\", width);\n");
    out.push_str("        result = (char *) malloc(sizeof(char) * list.length * 24 + 1);\n");
    out.push_str("        if (result == NULL) exit(EXIT_FAILURE);\n");
    out.push_str("        result[0] = '\\0';\n");
    out.push_str("        char line[32];\n");
    out.push_str("        for (int k = 0; k < list.length; k++) {\n");
    out.push_str("            if (list.items[k] == 0) continue;\n");
    out.push_str("            sprintf(line, fmt, k - list.offset, list.items[k]);\n");
    out.push_str("            strcat(result, line);\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("#endif\n");
    out.push_str("    free(list.items);\n");
    out.push_str("    return result;\n");
    out.push_str("}\n");

    if !function_only {
        out.push_str(MAIN_FUNC);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EntryTable, Instruction};

    fn program() -> Program {
        Program {
            instructions: vec![
                Instruction::new(Opcode::If, 3),
                Instruction::new(Opcode::Inc, 1),
                Instruction::new(Opcode::Exit, 0),
                Instruction::new(Opcode::Dec, 1),
                Instruction::new(Opcode::Goto, 2),
            ],
            entries: EntryTable {
                right: 1,
                down: 3,
                left: 0,
            },
            input_as_text: false,
            output_as_text: false,
        }
    }

    #[test]
    fn function_only_omits_main() {
        let out = emit(&program(), true);
        assert!(!out.contains("int main("));
    }

    #[test]
    fn standalone_output_carries_main() {
        let out = emit(&program(), false);
        assert!(out.contains("int main(int argc, char *argv[])"));
    }

    #[test]
    fn every_entry_offset_gets_a_labeled_case() {
        let out = emit(&program(), true);
        assert!(out.contains("case 0: goto hbchtpos0;"));
        assert!(out.contains("case 1: goto hbchtpos1;"));
        assert!(out.contains("case 2: goto hbchtpos3;"));
        assert!(out.contains("case 3: goto hbchtpos0;"));
    }

    #[test]
    fn the_trailing_label_is_followed_by_a_statement_not_a_bare_declaration() {
        let out = emit(&program(), true);
        assert!(out.contains("hbchtposend:\n    ;\n"));
    }

    #[test]
    fn input_as_text_flag_defines_the_text_macro() {
        let mut p = program();
        p.input_as_text = true;
        let out = emit(&p, true);
        assert!(out.contains("#define HBCHT_INPUT_AS_TEXT"));
    }

    #[test]
    fn output_width_is_computed_from_the_extreme_nonzero_indices() {
        let out = emit(&program(), true);
        assert!(out.contains("int width = (int) strlen(tmp);"));
        assert!(out.contains("sprintf(fmt, \"%%%dd: %%d\\n\", width);"));
    }

    #[test]
    fn a_program_ending_in_exit_still_closes_its_block_cleanly() {
        let mut p = program();
        p.instructions.push(Instruction::new(Opcode::Exit, 0));
        let out = emit(&p, true);
        assert!(out.contains("goto hbchtposend;"));
    }
}
