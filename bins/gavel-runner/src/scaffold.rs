/// Solution template generation from inferred input shapes.
///
/// One generator per target language, each emitting a complete ready-to-fill
/// source file: stdin parsers for every distinct input shape, a `Solution`
/// with the requested function name and one parameter per input position,
/// and a `main` that parses the inputs in order, calls the solution, and
/// prints the result in the canonical bracketed form.
use gavel_common::types::ValueShape;

fn param_name(position: usize) -> char {
    (b'a' + (position as u8 % 26)) as char
}

fn distinct_shapes(shapes: &[ValueShape]) -> Vec<ValueShape> {
    let mut seen = Vec::new();
    for shape in shapes {
        if !seen.contains(shape) {
            seen.push(*shape);
        }
    }
    seen
}

/// Generate a C++ solution template.
pub fn cpp_template(function_name: &str, shapes: &[ValueShape]) -> String {
    let mut out = String::from("#include <bits/stdc++.h>\nusing namespace std;\n\n");

    for shape in distinct_shapes(shapes) {
        if let Some(parser) = cpp_parser(shape) {
            out.push_str(parser);
            out.push_str("\n\n");
        }
    }

    out.push_str(CPP_PRINTERS);
    out.push_str("\n");

    let params: Vec<String> = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| format!("{} {}", cpp_type(*shape), param_name(i)))
        .collect();
    out.push_str(&format!(
        "class Solution {{\npublic:\n    int {}({}) {{\n        // implement me\n    }}\n}};\n\n",
        function_name,
        params.join(", ")
    ));

    out.push_str("int main() {\n    Solution solution;\n\n");
    for (i, shape) in shapes.iter().enumerate() {
        let name = param_name(i);
        match shape {
            ValueShape::ListInt => out.push_str(&format!("    auto {} = parseVector();\n", name)),
            ValueShape::MatrixInt => out.push_str(&format!("    auto {} = parseMatrix();\n", name)),
            ValueShape::Str => out.push_str(&format!("    auto {} = parseString();\n", name)),
            ValueShape::ListStr => {
                out.push_str(&format!("    auto {} = parseStringVector();\n", name))
            }
            ValueShape::Int => {
                out.push_str(&format!("    int {};\n    cin >> {};\n", name, name))
            }
        }
    }

    let args: Vec<String> = (0..shapes.len()).map(|i| param_name(i).to_string()).collect();
    out.push_str(&format!(
        "\n    auto result = solution.{}({});\n    printResult(result);\n    cout << endl;\n    return 0;\n}}\n",
        function_name,
        args.join(", ")
    ));

    out
}

/// Generate a Python solution template.
pub fn python_template(function_name: &str, shapes: &[ValueShape]) -> String {
    let mut out = String::from("from typing import List, Optional\n\n");

    for shape in distinct_shapes(shapes) {
        if let Some(parser) = python_parser(shape) {
            out.push_str(parser);
            out.push_str("\n\n");
        }
    }

    out.push_str(PYTHON_FORMATTER);
    out.push_str("\n");

    let params: Vec<String> = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| format!("{}: {}", param_name(i), python_hint(*shape)))
        .collect();
    let sep = if params.is_empty() { "" } else { ", " };
    out.push_str(&format!(
        "class Solution:\n    def {}(self{}{}) -> int:\n        # implement me\n        pass\n\n",
        function_name,
        sep,
        params.join(", ")
    ));

    out.push_str("def main():\n    solution = Solution()\n\n");
    for (i, shape) in shapes.iter().enumerate() {
        let name = param_name(i);
        match shape {
            ValueShape::ListInt => out.push_str(&format!("    {} = parse_list()\n", name)),
            ValueShape::MatrixInt => out.push_str(&format!("    {} = parse_matrix()\n", name)),
            ValueShape::Str => out.push_str(&format!("    {} = parse_string()\n", name)),
            ValueShape::ListStr => out.push_str(&format!("    {} = parse_string_list()\n", name)),
            ValueShape::Int => out.push_str(&format!("    {} = int(input())\n", name)),
        }
    }

    let args: Vec<String> = (0..shapes.len()).map(|i| param_name(i).to_string()).collect();
    out.push_str(&format!(
        "\n    result = solution.{}({})\n    print(format_output(result))\n\nif __name__ == '__main__':\n    main()\n",
        function_name,
        args.join(", ")
    ));

    out
}

fn cpp_type(shape: ValueShape) -> &'static str {
    match shape {
        ValueShape::Int => "int",
        ValueShape::Str => "string",
        ValueShape::ListInt => "vector<int>",
        ValueShape::ListStr => "vector<string>",
        ValueShape::MatrixInt => "vector<vector<int>>",
    }
}

fn python_hint(shape: ValueShape) -> &'static str {
    match shape {
        ValueShape::Int => "int",
        ValueShape::Str => "str",
        ValueShape::ListInt => "List[int]",
        ValueShape::ListStr => "List[str]",
        ValueShape::MatrixInt => "List[List[int]]",
    }
}

fn cpp_parser(shape: ValueShape) -> Option<&'static str> {
    match shape {
        ValueShape::ListInt => Some(
            r#"vector<int> parseVector() {
    string line;
    getline(cin, line);
    stringstream ss(line.substr(1, line.length()-2));
    vector<int> result;
    string num;
    while (getline(ss, num, ',')) {
        result.push_back(stoi(num));
    }
    return result;
}"#,
        ),
        ValueShape::MatrixInt => Some(
            r#"vector<vector<int>> parseMatrix() {
    string line;
    getline(cin, line);
    vector<vector<int>> matrix;
    stringstream ss(line.substr(1, line.length()-2));
    string row;
    while (getline(ss, row, ']')) {
        if (row.empty() || row == "[") continue;
        if (row[0] == ',') row = row.substr(1);
        if (row[0] == '[') row = row.substr(1);
        stringstream rowss(row);
        vector<int> rowVec;
        string num;
        while (getline(rowss, num, ',')) {
            if (!num.empty()) {
                rowVec.push_back(stoi(num));
            }
        }
        if (!rowVec.empty()) {
            matrix.push_back(rowVec);
        }
    }
    return matrix;
}"#,
        ),
        ValueShape::Str => Some(
            r#"string parseString() {
    string line;
    getline(cin, line);
    return line.substr(1, line.length()-2);
}"#,
        ),
        ValueShape::ListStr => Some(
            r#"vector<string> parseStringVector() {
    string line;
    getline(cin, line);
    stringstream ss(line.substr(1, line.length()-2));
    vector<string> result;
    string word;
    while (getline(ss, word, ',')) {
        word = word.substr(word.find('"') + 1);
        word = word.substr(0, word.find('"'));
        result.push_back(word);
    }
    return result;
}"#,
        ),
        ValueShape::Int => None,
    }
}

fn python_parser(shape: ValueShape) -> Option<&'static str> {
    match shape {
        ValueShape::ListInt => Some(
            r#"def parse_list():
    line = input().strip()
    return [int(x) for x in line[1:-1].split(',') if x]"#,
        ),
        ValueShape::MatrixInt => Some(
            r#"def parse_matrix():
    line = input().strip()
    line = line[1:-1]
    matrix = []
    current = []
    num = ''
    for char in line:
        if char == '[':
            current = []
        elif char == ']':
            if num:
                current.append(int(num))
                num = ''
            if current:
                matrix.append(current)
        elif char == ',':
            if num:
                current.append(int(num))
                num = ''
        elif char.strip():
            num += char
    return matrix"#,
        ),
        ValueShape::Str => Some(
            r#"def parse_string():
    line = input().strip()
    return line[1:-1]"#,
        ),
        ValueShape::ListStr => Some(
            r#"def parse_string_list():
    line = input().strip()
    return [x.strip().strip('"') for x in line[1:-1].split(',') if x.strip()]"#,
        ),
        ValueShape::Int => None,
    }
}

const CPP_PRINTERS: &str = r#"template<typename T>
void printVector(const vector<T>& vec) {
    cout << "[";
    for (size_t i = 0; i < vec.size(); i++) {
        cout << vec[i];
        if (i + 1 < vec.size()) cout << ",";
    }
    cout << "]";
}

template<typename T>
void printResult(const T& result) {
    cout << result;
}

template<>
void printResult(const vector<int>& result) {
    printVector(result);
}

template<>
void printResult(const string& result) {
    cout << "\"" << result << "\"";
}

template<>
void printResult(const vector<vector<int>>& result) {
    cout << "[";
    for (size_t i = 0; i < result.size(); i++) {
        printVector(result[i]);
        if (i + 1 < result.size()) cout << ",";
    }
    cout << "]";
}
"#;

const PYTHON_FORMATTER: &str = r#"def format_output(result) -> str:
    if isinstance(result, list):
        if result and isinstance(result[0], list):
            return str([[int(x) for x in row] for row in result]).replace(' ', '')
        return str([int(x) for x in result]).replace(' ', '')
    if isinstance(result, str):
        return f'"{result}"'
    return str(result)
"#;
